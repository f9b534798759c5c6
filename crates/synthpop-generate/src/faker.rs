//! Name source backed by the `fake` crate.

use std::fmt;

use fake::Fake;
use fake::faker::address::{en as address_en, pt_br as address_pt_br};
use fake::faker::internet::{en as internet_en, pt_br as internet_pt_br};
use fake::faker::name::{en as name_en, pt_br as name_pt_br};
use rand::RngCore;

use crate::errors::GenerationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleKey {
    EnUs,
    PtBr,
}

impl LocaleKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seeded source of names, email domains and city names.
#[derive(Debug, Clone, Copy)]
pub struct NameSource {
    locale: LocaleKey,
}

impl NameSource {
    pub fn new(locale: LocaleKey) -> Self {
        Self { locale }
    }

    pub fn for_locale(locale: &str) -> Result<Self, GenerationError> {
        LocaleKey::parse(locale).map(Self::new).ok_or_else(|| {
            GenerationError::Synthesis(format!("unsupported faker locale '{locale}'"))
        })
    }

    pub fn first_name(&self, rng: &mut dyn RngCore) -> String {
        match self.locale {
            LocaleKey::EnUs => name_en::FirstName().fake_with_rng(rng),
            LocaleKey::PtBr => name_pt_br::FirstName().fake_with_rng(rng),
        }
    }

    pub fn last_name(&self, rng: &mut dyn RngCore) -> String {
        match self.locale {
            LocaleKey::EnUs => name_en::LastName().fake_with_rng(rng),
            LocaleKey::PtBr => name_pt_br::LastName().fake_with_rng(rng),
        }
    }

    pub fn free_email_domain(&self, rng: &mut dyn RngCore) -> String {
        match self.locale {
            LocaleKey::EnUs => internet_en::FreeEmailProvider().fake_with_rng(rng),
            LocaleKey::PtBr => internet_pt_br::FreeEmailProvider().fake_with_rng(rng),
        }
    }

    pub fn city(&self, rng: &mut dyn RngCore) -> String {
        match self.locale {
            LocaleKey::EnUs => address_en::CityName().fake_with_rng(rng),
            LocaleKey::PtBr => address_pt_br::CityName().fake_with_rng(rng),
        }
    }
}
