use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// A record carried a locale other than `fi` or `sv` under the strict policy.
    UnknownLocale { key: String, locale: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocale { key, locale } => {
                write!(f, "key '{key}': unsupported locale '{locale}' (expected fi or sv)")
            }
        }
    }
}

impl std::error::Error for ReconError {}
