use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which part of the subject photo the try-on provider should replace.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClothesType {
    #[default]
    UpperBody,
    LowerBody,
    FullBody,
}

/// One try-on request: a subject photo, a garment photo, and a region tag.
/// Built per inbound request and never persisted.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub person_image: Vec<u8>,
    pub garment_image: Vec<u8>,
    pub clothes_type: ClothesType,
}

/// Successful try-on payload returned to the caller. The URL list is passed
/// through from the provider unchanged.
#[derive(Debug, Serialize, Deserialize)]
pub struct TryOnResponse {
    pub result: TryOnResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TryOnResult {
    pub output_image_url: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn clothes_type_parses_wire_values() {
        assert_eq!(ClothesType::from_str("upper_body").unwrap(), ClothesType::UpperBody);
        assert_eq!(ClothesType::from_str("lower_body").unwrap(), ClothesType::LowerBody);
        assert_eq!(ClothesType::from_str("full_body").unwrap(), ClothesType::FullBody);
        assert!(ClothesType::from_str("hat").is_err());
    }

    #[test]
    fn clothes_type_displays_as_provider_field() {
        assert_eq!(ClothesType::UpperBody.to_string(), "upper_body");
        assert_eq!(ClothesType::default(), ClothesType::UpperBody);
    }
}
