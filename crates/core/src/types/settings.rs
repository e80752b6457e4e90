//! Site settings domain types.

use serde::{Deserialize, Serialize};

/// Site-wide display settings.
///
/// A flat singleton record: exactly one settings record exists per
/// deployment. Seeded with defaults on first run, overwritten wholesale or
/// field-by-field by admin saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Hero banner title.
    pub hero_title: String,
    /// Hero banner subtitle.
    pub hero_subtitle: String,
    /// Raw WhatsApp number used for `wa.me` links (e.g. `5585999999999`).
    pub whatsapp: String,
    /// Formatted WhatsApp number for display (e.g. `(85) 99999-9999`).
    pub whatsapp_display: String,
    /// Instagram handle without the leading `@`.
    pub instagram: String,
    /// Postal address shown on the contact page.
    pub address: String,
    /// Hours-of-operation display string.
    pub business_hours: String,
    /// Map embed URL for the contact page.
    pub maps_url: String,
    /// Latitude of the restaurant.
    pub location_lat: f64,
    /// Longitude of the restaurant.
    pub location_lng: f64,
}

/// Partial update of [`SiteSettings`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<f64>,
}

impl SettingsPatch {
    /// Whether this patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hero_title.is_none()
            && self.hero_subtitle.is_none()
            && self.whatsapp.is_none()
            && self.whatsapp_display.is_none()
            && self.instagram.is_none()
            && self.address.is_none()
            && self.business_hours.is_none()
            && self.maps_url.is_none()
            && self.location_lat.is_none()
            && self.location_lng.is_none()
    }

    /// Apply this patch to a settings record in place.
    pub fn apply_to(&self, settings: &mut SiteSettings) {
        if let Some(v) = &self.hero_title {
            settings.hero_title.clone_from(v);
        }
        if let Some(v) = &self.hero_subtitle {
            settings.hero_subtitle.clone_from(v);
        }
        if let Some(v) = &self.whatsapp {
            settings.whatsapp.clone_from(v);
        }
        if let Some(v) = &self.whatsapp_display {
            settings.whatsapp_display.clone_from(v);
        }
        if let Some(v) = &self.instagram {
            settings.instagram.clone_from(v);
        }
        if let Some(v) = &self.address {
            settings.address.clone_from(v);
        }
        if let Some(v) = &self.business_hours {
            settings.business_hours.clone_from(v);
        }
        if let Some(v) = &self.maps_url {
            settings.maps_url.clone_from(v);
        }
        if let Some(v) = self.location_lat {
            settings.location_lat = v;
        }
        if let Some(v) = self.location_lng {
            settings.location_lng = v;
        }
    }
}

impl From<SiteSettings> for SettingsPatch {
    /// A patch that rewrites every field - used for wholesale saves.
    fn from(settings: SiteSettings) -> Self {
        Self {
            hero_title: Some(settings.hero_title),
            hero_subtitle: Some(settings.hero_subtitle),
            whatsapp: Some(settings.whatsapp),
            whatsapp_display: Some(settings.whatsapp_display),
            instagram: Some(settings.instagram),
            address: Some(settings.address),
            business_hours: Some(settings.business_hours),
            maps_url: Some(settings.maps_url),
            location_lat: Some(settings.location_lat),
            location_lng: Some(settings.location_lng),
        }
    }
}
