//! JSON-LD business listing.
//!
//! Name, street address, locality and url follow the active language; phone,
//! postal code, country, coordinates and the social profile do not.

use crate::i18n::Language;
use serde::Serialize;

/// A string with one value per site language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub arabic: String,
    pub english: String,
}

impl LocalizedText {
    pub fn new(arabic: &str, english: &str) -> Self {
        Self {
            arabic: arabic.to_string(),
            english: english.to_string(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        if language == Language::ARABIC {
            &self.arabic
        } else {
            &self.english
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    pub name: LocalizedText,
    pub street_address: LocalizedText,
    pub locality: LocalizedText,
    /// Path of the logo, relative to the site base URL
    pub image_path: String,
    pub telephone: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub same_as: String,
}

impl BusinessProfile {
    pub fn fpico() -> Self {
        Self {
            name: LocalizedText::new("FIPCO", "FIPCO"),
            street_address: LocalizedText::new(
                "طريق الملك عبد العزيز, الياسمين 13322",
                "King Abdul Aziz Road, Al Yasmin 13322",
            ),
            locality: LocalizedText::new("الرياض", "Riyadh"),
            image_path: "/images/my-fav.ico/web-app-manifest-192x192.png".to_string(),
            telephone: "009660558200003".to_string(),
            postal_code: "00966".to_string(),
            country: "SA".to_string(),
            latitude: 24.8113661,
            longitude: 46.6476203,
            same_as: "https://www.linkedin.com/company/fpicosa".to_string(),
        }
    }

    /// Build the schema.org document for `language`.
    pub fn to_schema(&self, base_url: &str, language: Language) -> GeneralContractor<'_> {
        GeneralContractor {
            context: "https://schema.org",
            kind: "GeneralContractor",
            name: self.name.get(language),
            image: format!("{}{}", base_url, self.image_path),
            id: "",
            url: format!("{}/{}", base_url, language.code()),
            telephone: &self.telephone,
            address: PostalAddress {
                kind: "PostalAddress",
                street_address: self.street_address.get(language),
                address_locality: self.locality.get(language),
                postal_code: &self.postal_code,
                address_country: &self.country,
            },
            geo: GeoCoordinates {
                kind: "GeoCoordinates",
                latitude: self.latitude,
                longitude: self.longitude,
            },
            same_as: &self.same_as,
        }
    }

    /// Serialized JSON-LD body for `language`.
    pub fn to_json_ld(&self, base_url: &str, language: Language) -> String {
        // Serializing plain strings and finite floats cannot fail.
        serde_json::to_string(&self.to_schema(base_url, language)).unwrap_or_default()
    }
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self::fpico()
    }
}

#[derive(Debug, Serialize)]
pub struct GeneralContractor<'a> {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'a str,
    pub image: String,
    #[serde(rename = "@id")]
    pub id: &'static str,
    pub url: String,
    pub telephone: &'a str,
    pub address: PostalAddress<'a>,
    pub geo: GeoCoordinates,
    #[serde(rename = "sameAs")]
    pub same_as: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress<'a> {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub street_address: &'a str,
    pub address_locality: &'a str,
    pub postal_code: &'a str,
    pub address_country: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GeoCoordinates {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}
