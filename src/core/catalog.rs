use crate::core::provider::{Provider, ProviderError, ProviderId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from building or querying a provider catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid provider: {0}")]
    InvalidProvider(#[from] ProviderError),
    #[error("provider {0} is already registered")]
    DuplicateProvider(ProviderId),
    #[error("no provider registered with id {0}")]
    UnknownProvider(ProviderId),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape of a catalog.
#[derive(Deserialize)]
struct CatalogFile {
    providers: Vec<Provider>,
}

#[derive(Serialize)]
struct CatalogFileRef<'a> {
    providers: Vec<&'a Provider>,
}

/// A snapshot of lending providers, keyed by id.
///
/// The catalog is owned by the caller and handed to the plan generator per
/// request. It is never mutated during a computation; enabling, disabling or
/// re-pricing a provider means building a new catalog value.
///
/// Iteration order is by provider id.
///
/// # Examples
///
/// ```
/// use emi_engine::core::catalog::ProviderCatalog;
/// use emi_engine::core::provider::Provider;
/// use rust_decimal_macros::dec;
///
/// let catalog = ProviderCatalog::from_providers(vec![
///     Provider::new("HDFC-CC", "HDFC Bank", dec!(1000), dec!(50000)).with_tenure(6, dec!(12)),
///     Provider::new("ICICI-CC", "ICICI Bank", dec!(2000), dec!(80000)).disabled(),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.enabled().count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: BTreeMap<ProviderId, Provider>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, validating every provider and rejecting duplicate ids.
    pub fn from_providers(
        providers: impl IntoIterator<Item = Provider>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for provider in providers {
            catalog.insert(provider)?;
        }
        Ok(catalog)
    }

    /// Parse a catalog from JSON of the form `{"providers": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_providers(file.providers)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register a provider.
    pub fn insert(&mut self, provider: Provider) -> Result<(), CatalogError> {
        provider.validate()?;
        if self.providers.contains_key(&provider.id) {
            return Err(CatalogError::DuplicateProvider(provider.id));
        }
        self.providers.insert(provider.id.clone(), provider);
        Ok(())
    }

    pub fn get(&self, id: &ProviderId) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// Look up a provider, treating an unknown id as an error.
    pub fn require(&self, id: &ProviderId) -> Result<&Provider, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownProvider(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Providers currently participating in plan generation.
    pub fn enabled(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values().filter(|p| p.enabled)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Serialize for ProviderCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CatalogFileRef {
            providers: self.providers.values().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProviderCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = CatalogFile::deserialize(deserializer)?;
        Self::from_providers(file.providers).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hdfc() -> Provider {
        Provider::new("HDFC-CC", "HDFC Bank", dec!(1000), dec!(50000))
            .with_tenure(3, dec!(10))
            .with_tenure(6, dec!(12))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = ProviderCatalog::new();
        catalog.insert(hdfc()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&ProviderId::new("HDFC-CC")).is_some());
        assert!(catalog.get(&ProviderId::new("SBI-CC")).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = ProviderCatalog::new();
        catalog.insert(hdfc()).unwrap();
        let err = catalog.insert(hdfc()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProvider(_)));
    }

    #[test]
    fn test_invalid_provider_rejected() {
        let bad = Provider::new("BAD", "Bad", dec!(10), dec!(1));
        let err = ProviderCatalog::from_providers(vec![bad]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidProvider(_)));
    }

    #[test]
    fn test_require_unknown() {
        let catalog = ProviderCatalog::from_providers(vec![hdfc()]).unwrap();
        let err = catalog.require(&ProviderId::new("NOPE")).unwrap_err();
        assert_eq!(err.to_string(), "no provider registered with id NOPE");
    }

    #[test]
    fn test_enabled_filter() {
        let catalog = ProviderCatalog::from_providers(vec![
            hdfc(),
            Provider::new("SBI-CC", "SBI Card", dec!(2500), dec!(100000)).disabled(),
        ])
        .unwrap();
        let enabled: Vec<_> = catalog.enabled().map(|p| p.id.as_str()).collect();
        assert_eq!(enabled, vec!["HDFC-CC"]);
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{
            "providers": [
                {
                    "id": "HDFC-CC",
                    "name": "HDFC Bank",
                    "min_amount": "1000",
                    "max_amount": "50000",
                    "supported_tenures": [3, 6, 12],
                    "interest_rates": { "3": "10", "6": "12", "12": "14" },
                    "processing_fee": "99"
                }
            ]
        }"#;
        let catalog = ProviderCatalog::from_json(json).unwrap();
        let p = catalog.require(&ProviderId::new("HDFC-CC")).unwrap();
        assert!(p.enabled);
        assert_eq!(p.rate_for(12), Some(dec!(14)));
        assert_eq!(p.processing_fee, dec!(99));
    }

    #[test]
    fn test_json_rejects_invalid_provider() {
        let json = r#"{"providers": [
            {"id": "X", "name": "X", "min_amount": "10", "max_amount": "1", "supported_tenures": []}
        ]}"#;
        assert!(ProviderCatalog::from_json(json).is_err());
    }
}
