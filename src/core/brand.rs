//! Brand taxonomy and model-name classification.
//!
//! Classification is a first-match substring scan over a fixed, ordered token
//! table. Several spellings may resolve to the same canonical brand
//! (`MERCEDES`, `M-BENZ`, `賓士` all become [`Brand::Benz`]).
//!
//! Table order:
//! 1. long spellings before their short forms (`MERCEDES-BENZ` before `BENZ`)
//! 2. premium sub-brands (`LEXUS`, `INFINITI`, `LUXGEN`, `PORSCHE`)
//! 3. remaining makes, with `MINI` last so `PREVIA MINIVAN` is not a MINI
//! 4. traditional-Chinese make names
//! 5. model-line aliases (`ALTIS`, `RAV4`, `86`, ...), so a make name always
//!    beats an alias that happens to appear in the same string

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed brand taxonomy. Records outside it are dropped from the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Brand {
    Toyota,
    Lexus,
    Honda,
    Nissan,
    Infiniti,
    Mazda,
    Mitsubishi,
    Subaru,
    Suzuki,
    Ford,
    Volkswagen,
    Bmw,
    Mini,
    Benz,
    Audi,
    Porsche,
    Volvo,
    Hyundai,
    Kia,
    Luxgen,
}

impl Brand {
    pub const ALL: [Brand; 20] = [
        Brand::Toyota,
        Brand::Lexus,
        Brand::Honda,
        Brand::Nissan,
        Brand::Infiniti,
        Brand::Mazda,
        Brand::Mitsubishi,
        Brand::Subaru,
        Brand::Suzuki,
        Brand::Ford,
        Brand::Volkswagen,
        Brand::Bmw,
        Brand::Mini,
        Brand::Benz,
        Brand::Audi,
        Brand::Porsche,
        Brand::Volvo,
        Brand::Hyundai,
        Brand::Kia,
        Brand::Luxgen,
    ];

    /// Canonical upper-case id, identical to the serde form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Brand::Toyota => "TOYOTA",
            Brand::Lexus => "LEXUS",
            Brand::Honda => "HONDA",
            Brand::Nissan => "NISSAN",
            Brand::Infiniti => "INFINITI",
            Brand::Mazda => "MAZDA",
            Brand::Mitsubishi => "MITSUBISHI",
            Brand::Subaru => "SUBARU",
            Brand::Suzuki => "SUZUKI",
            Brand::Ford => "FORD",
            Brand::Volkswagen => "VOLKSWAGEN",
            Brand::Bmw => "BMW",
            Brand::Mini => "MINI",
            Brand::Benz => "BENZ",
            Brand::Audi => "AUDI",
            Brand::Porsche => "PORSCHE",
            Brand::Volvo => "VOLVO",
            Brand::Hyundai => "HYUNDAI",
            Brand::Kia => "KIA",
            Brand::Luxgen => "LUXGEN",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a token names the make itself or one of its model lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Make,
    Model,
}

struct BrandToken {
    token: &'static str,
    brand: Brand,
    kind: TokenKind,
}

const fn make(token: &'static str, brand: Brand) -> BrandToken {
    BrandToken { token, brand, kind: TokenKind::Make }
}

const fn model(token: &'static str, brand: Brand) -> BrandToken {
    BrandToken { token, brand, kind: TokenKind::Model }
}

const BRAND_TOKENS: &[BrandToken] = &[
    // 1) long spellings first
    make("MERCEDES-BENZ", Brand::Benz),
    make("MERCEDES", Brand::Benz),
    make("M-BENZ", Brand::Benz),
    make("BENZ", Brand::Benz),
    make("VOLKSWAGEN", Brand::Volkswagen),
    make("VW", Brand::Volkswagen),
    // 2) premium sub-brands
    make("LEXUS", Brand::Lexus),
    make("INFINITI", Brand::Infiniti),
    make("LUXGEN", Brand::Luxgen),
    make("PORSCHE", Brand::Porsche),
    // 3) remaining makes
    make("TOYOTA", Brand::Toyota),
    make("HONDA", Brand::Honda),
    make("NISSAN", Brand::Nissan),
    make("MAZDA", Brand::Mazda),
    make("MITSUBISHI", Brand::Mitsubishi),
    make("SUBARU", Brand::Subaru),
    make("SUZUKI", Brand::Suzuki),
    make("FORD", Brand::Ford),
    make("BMW", Brand::Bmw),
    make("AUDI", Brand::Audi),
    make("VOLVO", Brand::Volvo),
    make("HYUNDAI", Brand::Hyundai),
    make("KIA", Brand::Kia),
    make("MINI", Brand::Mini),
    // 4) traditional-Chinese make names
    make("凌志", Brand::Lexus),
    make("保時捷", Brand::Porsche),
    make("納智捷", Brand::Luxgen),
    make("豐田", Brand::Toyota),
    make("本田", Brand::Honda),
    make("日產", Brand::Nissan),
    make("馬自達", Brand::Mazda),
    make("三菱", Brand::Mitsubishi),
    make("速霸陸", Brand::Subaru),
    make("鈴木", Brand::Suzuki),
    make("福特", Brand::Ford),
    make("福斯", Brand::Volkswagen),
    make("寶馬", Brand::Bmw),
    make("賓士", Brand::Benz),
    make("奧迪", Brand::Audi),
    make("富豪", Brand::Volvo),
    make("現代", Brand::Hyundai),
    make("起亞", Brand::Kia),
    // 5) model-line aliases
    model("ALTIS", Brand::Toyota),
    model("COROLLA", Brand::Toyota),
    model("CAMRY", Brand::Toyota),
    model("YARIS", Brand::Toyota),
    model("VIOS", Brand::Toyota),
    model("WISH", Brand::Toyota),
    model("SIENTA", Brand::Toyota),
    model("PREVIA", Brand::Toyota),
    model("ALPHARD", Brand::Toyota),
    model("RAV4", Brand::Toyota),
    model("PRIUS", Brand::Toyota),
    model("HIACE", Brand::Toyota),
    model("TOWN ACE", Brand::Toyota),
    model("HILUX", Brand::Toyota),
    model("SUPRA", Brand::Toyota),
    model("GR86", Brand::Toyota),
    model("CIVIC", Brand::Honda),
    model("ACCORD", Brand::Honda),
    model("CR-V", Brand::Honda),
    model("CRV", Brand::Honda),
    model("HR-V", Brand::Honda),
    model("ODYSSEY", Brand::Honda),
    model("S2000", Brand::Honda),
    model("SENTRA", Brand::Nissan),
    model("TIIDA", Brand::Nissan),
    model("MARCH", Brand::Nissan),
    model("X-TRAIL", Brand::Nissan),
    model("TEANA", Brand::Nissan),
    model("LIVINA", Brand::Nissan),
    model("GT-R", Brand::Nissan),
    model("370Z", Brand::Nissan),
    model("CX-5", Brand::Mazda),
    model("CX-9", Brand::Mazda),
    model("MX-5", Brand::Mazda),
    model("OUTLANDER", Brand::Mitsubishi),
    model("LANCER", Brand::Mitsubishi),
    model("DELICA", Brand::Mitsubishi),
    model("ZINGER", Brand::Mitsubishi),
    model("VERYCA", Brand::Mitsubishi),
    model("CANTER", Brand::Mitsubishi),
    model("BRZ", Brand::Subaru),
    model("FORESTER", Brand::Subaru),
    model("IMPREZA", Brand::Subaru),
    model("SWIFT", Brand::Suzuki),
    model("JIMNY", Brand::Suzuki),
    model("FOCUS", Brand::Ford),
    model("KUGA", Brand::Ford),
    model("FIESTA", Brand::Ford),
    model("RANGER", Brand::Ford),
    model("GOLF", Brand::Volkswagen),
    model("TIGUAN", Brand::Volkswagen),
    model("TOURAN", Brand::Volkswagen),
    model("SHARAN", Brand::Volkswagen),
    model("PASSAT", Brand::Volkswagen),
    model("AMG", Brand::Benz),
    model("CAYENNE", Brand::Porsche),
    model("MACAN", Brand::Porsche),
    model("PANAMERA", Brand::Porsche),
    model("CAYMAN", Brand::Porsche),
    model("BOXSTER", Brand::Porsche),
    model("XC90", Brand::Volvo),
    model("XC60", Brand::Volvo),
    model("TUCSON", Brand::Hyundai),
    model("ELANTRA", Brand::Hyundai),
    model("SANTA FE", Brand::Hyundai),
    model("PICANTO", Brand::Kia),
    model("CARNIVAL", Brand::Kia),
    model("SORENTO", Brand::Kia),
    model("SPORTAGE", Brand::Kia),
    model("URX", Brand::Luxgen),
    // bare "86" is last: it is the shortest and riskiest alias
    model("86", Brand::Toyota),
];

/// Classify a model name into a canonical brand.
///
/// Returns `None` ("unclassified") when no token of the table occurs in the
/// upper-cased name. Callers drop such records from the working inventory.
pub fn classify_brand(model_name: &str) -> Option<Brand> {
    let upper = model_name.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    BRAND_TOKENS
        .iter()
        .find(|t| upper.contains(t.token))
        .map(|t| t.brand)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown brand '{0}'")]
pub struct UnknownBrand(pub String);

/// Parses a brand id or any make spelling (`mercedes`, `vw`, `賓士`).
/// Model-line aliases are not accepted here: `altis` is not a brand.
impl FromStr for Brand {
    type Err = UnknownBrand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();

        if let Some(brand) = Brand::ALL.iter().find(|b| b.as_str() == upper) {
            return Ok(*brand);
        }

        BRAND_TOKENS
            .iter()
            .filter(|t| t.kind == TokenKind::Make)
            .find(|t| t.token == upper)
            .map(|t| t.brand)
            .ok_or_else(|| UnknownBrand(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_make_names() {
        assert_eq!(classify_brand("TOYOTA ALTIS 1.8"), Some(Brand::Toyota));
        assert_eq!(classify_brand("bmw 320i 2012 sport"), Some(Brand::Bmw));
        assert_eq!(classify_brand("  PORSCHE 911 CARRERA "), Some(Brand::Porsche));
    }

    #[test]
    fn canonicalizes_synonymous_spellings() {
        assert_eq!(classify_brand("MERCEDES-BENZ C300"), Some(Brand::Benz));
        assert_eq!(classify_brand("M-BENZ E250"), Some(Brand::Benz));
        assert_eq!(classify_brand("賓士 S350"), Some(Brand::Benz));
        assert_eq!(classify_brand("VW GOLF TSI"), Some(Brand::Volkswagen));
        assert_eq!(classify_brand("VOLKSWAGEN TIGUAN"), Some(Brand::Volkswagen));
    }

    #[test]
    fn model_aliases_resolve_when_no_make_is_present() {
        assert_eq!(classify_brand("ALTIS"), Some(Brand::Toyota));
        assert_eq!(classify_brand("RAV4 HYBRID"), Some(Brand::Toyota));
        assert_eq!(classify_brand("86"), Some(Brand::Toyota));
        assert_eq!(classify_brand("CR-V 2.0"), Some(Brand::Honda));
    }

    #[test]
    fn make_beats_model_alias_and_minivan_is_not_mini() {
        // "AMG" is a BENZ alias, but the make comes first in the table
        assert_eq!(classify_brand("BMW M3 NOT AMG"), Some(Brand::Bmw));
        assert_eq!(classify_brand("TOYOTA PREVIA MINIVAN"), Some(Brand::Toyota));
        assert_eq!(classify_brand("MINI COOPER S"), Some(Brand::Mini));
    }

    #[test]
    fn unknown_names_are_unclassified() {
        assert_eq!(classify_brand("TESLA MODEL 3"), None);
        assert_eq!(classify_brand(""), None);
        assert_eq!(classify_brand("   "), None);
    }

    #[test]
    fn parses_brand_ids_and_make_spellings() {
        assert_eq!("toyota".parse::<Brand>(), Ok(Brand::Toyota));
        assert_eq!(" Mercedes ".parse::<Brand>(), Ok(Brand::Benz));
        assert_eq!("vw".parse::<Brand>(), Ok(Brand::Volkswagen));
        assert_eq!("altis".parse::<Brand>(), Err(UnknownBrand("altis".to_string())));
        assert!("tesla".parse::<Brand>().is_err());
    }

    #[test]
    fn display_matches_serde_form() {
        for brand in Brand::ALL {
            let json = serde_json::to_string(&brand).unwrap();
            assert_eq!(json, format!("\"{}\"", brand));
        }
    }
}
