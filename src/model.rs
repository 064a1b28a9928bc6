//! Request and response models for the IDMatrix service.
//!
//! Field names map to the PascalCase JSON shape used by IDMatrix callers.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdMatrixRequest {
    pub client_reference: Option<String>,
    pub reason: Option<String>,
    pub consents: Option<Consents>,
    pub family_name: Option<String>,
    pub first_given_name: Option<String>,
    pub other_given_name: Option<String>,
    /// Must fall within years 1..=9999 so it renders as `YYYY-MM-DD`.
    #[serde(with = "date_of_birth")]
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub addresses: Option<Addresses>,
}

impl IdMatrixRequest {
    /// Create a request with only the date of birth set.
    ///
    /// The date must fall within years 1..=9999; chrono renders other years
    /// with a sign or more than four digits.
    pub fn new(date_of_birth: NaiveDate) -> Self {
        Self {
            client_reference: None,
            reason: None,
            consents: None,
            family_name: None,
            first_given_name: None,
            other_given_name: None,
            date_of_birth,
            gender: None,
            addresses: None,
        }
    }

    pub fn current_address(&self) -> Option<&Address> {
        self.addresses.as_ref()?.current_address.as_ref()
    }

    pub fn previous_address(&self) -> Option<&Address> {
        self.addresses.as_ref()?.previous_address.as_ref()
    }
}

/// Consent flags, one per verification source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Consents {
    pub veda_credit_bureau: bool,
    pub drivers_licence: bool,
    pub medicare: bool,
    pub australian_passport: bool,
    pub visa_entitlement_verification_online: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Addresses {
    pub current_address: Option<Address>,
    pub previous_address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub property: Option<String>,
    pub unit_number: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub unformatted_address: Option<String>,
    pub phone: Option<Phone>,
    pub employment: Option<Employment>,
    pub email_address: Option<String>,
    pub alternative_email_address: Option<String>,
    pub drivers_licence_details: Option<DriversLicenceDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Phone {
    pub numbers: Option<PhoneNumbers>,
    pub phone_authentication: Option<PhoneAuthentication>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneNumbers {
    pub home_phone_number: Option<String>,
    pub mobile_phone_number: Option<String>,
    pub work_phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneAuthentication {
    pub number: Option<String>,
    pub send_pin_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employment {
    pub employer: Option<String>,
    pub occupation: Option<String>,
    #[serde(rename = "ANZSICClassCode")]
    pub anzsic_class_code: Option<String>,
    #[serde(rename = "EmployerABN")]
    pub employer_abn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DriversLicenceDetails {
    pub state_code: Option<String>,
    pub number: Option<String>,
    pub card_number: Option<String>,
}

/// Decoded verification response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IdMatrixResponse {
    pub message_id: String,
    pub client_reference: String,
    pub overall_outcome: String,
    pub verification_outcome: String,
    pub status: String,
    pub total_points: BigDecimal,
    pub verification_results: Vec<VerificationResult>,
    pub errors: Vec<ErrorDetail>,
}

/// Outcome of a single verification check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VerificationResult {
    #[serde(rename = "Type")]
    pub kind: String,
    pub outcome: String,
    pub points: BigDecimal,
    pub details: String,
}

/// Error reported by the service for a request field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub field: String,
}

/// Date of birth as `YYYY-MM-DD`.
///
/// Also accepts the `1990-05-01T00:00:00` form .NET serializers emit and
/// RFC 3339 timestamps.
mod date_of_birth {
    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    /// Years that format as exactly four digits.
    pub const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("invalid date of birth '{}'", s)))
    }

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(s, FORMAT)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))?;
        YEARS.contains(&date.year()).then_some(date)
    }
}
