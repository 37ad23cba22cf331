use fake::Fake;
use fake::faker;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::faker_rs::locales::LocaleKey;

/// Hints understood by [`FakerSource`].
pub const SUPPORTED_HINTS: &[&str] = &[
    "name",
    "first_name",
    "last_name",
    "email",
    "safe_email",
    "free_email",
    "user_name",
    "phone_number",
    "address",
    "street_address",
    "street_name",
    "building_number",
    "city",
    "state",
    "country",
    "postcode",
    "zipcode",
    "company",
    "catch_phrase",
    "bs",
    "word",
    "sentence",
    "paragraph",
    "text",
    "ipv4",
    "ipv6",
    "domain_name",
    "url",
    "uuid4",
    "date",
    "date_time",
    "iso8601",
    "time",
    "credit_card_number",
];

/// Supplier of realistic-looking text values for string fields.
pub trait ValueSource {
    /// Whether `hint` names a value this source can produce.
    fn supports(&self, hint: &str) -> bool;

    /// Produce a value for `hint`, or `None` if the hint is not supported.
    fn value(&mut self, hint: &str) -> Option<String>;

    /// A generic random word.
    fn word(&mut self) -> String;
}

/// [`ValueSource`] backed by the `fake` crate with its own random stream.
#[derive(Debug, Clone)]
pub struct FakerSource {
    locale: LocaleKey,
    rng: ChaCha8Rng,
}

impl FakerSource {
    pub fn new(locale: LocaleKey, rng: ChaCha8Rng) -> Self {
        Self { locale, rng }
    }

    pub fn seeded(locale: LocaleKey, seed: u64) -> Self {
        Self::new(locale, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    pub fn list_hints() -> &'static [&'static str] {
        SUPPORTED_HINTS
    }
}

macro_rules! localized_value {
    ($locale:ident, $hint:expr, $rng:ident) => {{
        let value: Option<String> = match $hint {
            "name" => Some(faker::name::$locale::Name().fake_with_rng(&mut *$rng)),
            "first_name" => Some(faker::name::$locale::FirstName().fake_with_rng(&mut *$rng)),
            "last_name" => Some(faker::name::$locale::LastName().fake_with_rng(&mut *$rng)),
            "email" | "free_email" => {
                Some(faker::internet::$locale::FreeEmail().fake_with_rng(&mut *$rng))
            }
            "safe_email" => Some(faker::internet::$locale::SafeEmail().fake_with_rng(&mut *$rng)),
            "user_name" => Some(faker::internet::$locale::Username().fake_with_rng(&mut *$rng)),
            "phone_number" => {
                Some(faker::phone_number::$locale::PhoneNumber().fake_with_rng(&mut *$rng))
            }
            "street_name" => Some(faker::address::$locale::StreetName().fake_with_rng(&mut *$rng)),
            "building_number" => {
                Some(faker::address::$locale::BuildingNumber().fake_with_rng(&mut *$rng))
            }
            "street_address" => {
                let number: String =
                    faker::address::$locale::BuildingNumber().fake_with_rng(&mut *$rng);
                let street: String =
                    faker::address::$locale::StreetName().fake_with_rng(&mut *$rng);
                Some(format!("{number} {street}"))
            }
            "address" => {
                let number: String =
                    faker::address::$locale::BuildingNumber().fake_with_rng(&mut *$rng);
                let street: String =
                    faker::address::$locale::StreetName().fake_with_rng(&mut *$rng);
                let city: String = faker::address::$locale::CityName().fake_with_rng(&mut *$rng);
                let state: String =
                    faker::address::$locale::StateAbbr().fake_with_rng(&mut *$rng);
                let zip: String = faker::address::$locale::ZipCode().fake_with_rng(&mut *$rng);
                Some(format!("{number} {street}, {city}, {state} {zip}"))
            }
            "city" => Some(faker::address::$locale::CityName().fake_with_rng(&mut *$rng)),
            "state" => Some(faker::address::$locale::StateName().fake_with_rng(&mut *$rng)),
            "country" => Some(faker::address::$locale::CountryName().fake_with_rng(&mut *$rng)),
            "postcode" => Some(faker::address::$locale::PostCode().fake_with_rng(&mut *$rng)),
            "zipcode" => Some(faker::address::$locale::ZipCode().fake_with_rng(&mut *$rng)),
            "company" => Some(faker::company::$locale::CompanyName().fake_with_rng(&mut *$rng)),
            "catch_phrase" => {
                Some(faker::company::$locale::CatchPhrase().fake_with_rng(&mut *$rng))
            }
            "bs" => Some(faker::company::$locale::Bs().fake_with_rng(&mut *$rng)),
            "word" => Some(faker::lorem::$locale::Word().fake_with_rng(&mut *$rng)),
            "sentence" => Some(faker::lorem::$locale::Sentence(4..10).fake_with_rng(&mut *$rng)),
            "paragraph" => {
                Some(faker::lorem::$locale::Paragraph(3..5).fake_with_rng(&mut *$rng))
            }
            "text" => Some(faker::lorem::$locale::Paragraph(1..3).fake_with_rng(&mut *$rng)),
            "ipv4" => Some(faker::internet::$locale::IPv4().fake_with_rng(&mut *$rng)),
            "ipv6" => Some(faker::internet::$locale::IPv6().fake_with_rng(&mut *$rng)),
            "domain_name" | "url" => {
                let word: String = faker::lorem::$locale::Word().fake_with_rng(&mut *$rng);
                let suffix: String =
                    faker::internet::$locale::DomainSuffix().fake_with_rng(&mut *$rng);
                let domain = format!("{}.{suffix}", word.to_lowercase());
                if $hint == "url" {
                    Some(format!("https://{domain}/"))
                } else {
                    Some(domain)
                }
            }
            "uuid4" => Some(
                uuid::Builder::from_random_bytes($rng.random())
                    .into_uuid()
                    .to_string(),
            ),
            "date" => {
                let date: chrono::NaiveDate =
                    faker::chrono::$locale::Date().fake_with_rng(&mut *$rng);
                Some(date.format("%Y-%m-%d").to_string())
            }
            "date_time" | "iso8601" => {
                let moment: chrono::DateTime<chrono::Utc> =
                    faker::chrono::$locale::DateTime().fake_with_rng(&mut *$rng);
                let pattern = if $hint == "iso8601" {
                    "%Y-%m-%dT%H:%M:%S"
                } else {
                    "%Y-%m-%d %H:%M:%S"
                };
                Some(moment.format(pattern).to_string())
            }
            "time" => {
                let time: chrono::NaiveTime =
                    faker::chrono::$locale::Time().fake_with_rng(&mut *$rng);
                Some(time.format("%H:%M:%S").to_string())
            }
            "credit_card_number" => {
                Some(faker::creditcard::$locale::CreditCardNumber().fake_with_rng(&mut *$rng))
            }
            _ => None,
        };
        value
    }};
}

impl ValueSource for FakerSource {
    fn supports(&self, hint: &str) -> bool {
        SUPPORTED_HINTS.contains(&hint)
    }

    fn value(&mut self, hint: &str) -> Option<String> {
        let rng = &mut self.rng;
        match self.locale {
            LocaleKey::EnUs => localized_value!(en, hint, rng),
            LocaleKey::PtBr => localized_value!(pt_br, hint, rng),
        }
    }

    fn word(&mut self) -> String {
        match self.locale {
            LocaleKey::EnUs => faker::lorem::en::Word().fake_with_rng(&mut self.rng),
            LocaleKey::PtBr => faker::lorem::pt_br::Word().fake_with_rng(&mut self.rng),
        }
    }
}
