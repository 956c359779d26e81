//! Hash key generator
//!
//! Fixes the hash-key contract for every entity: target column name, key
//! type, parent back-reference and the canonically ordered inputs. Values
//! are only computed at materialization (`HashKeyColumn::compute`).

use vaultsmith_core::{DataVaultModel, HashDiffColumn, HashKeyColumn, HashKeyType, NamingConfig};

pub struct HashKeyGenerator<'a> {
    naming: &'a NamingConfig,
}

impl<'a> HashKeyGenerator<'a> {
    pub fn new(naming: &'a NamingConfig) -> Self {
        Self { naming }
    }

    /// Hub key: business keys, no parent
    pub fn hub_key(&self, hub: &str, business_keys: &[String]) -> HashKeyColumn {
        HashKeyColumn::new(self.naming.hash_key_name(hub), HashKeyType::HashKeyHub, business_keys)
    }

    /// Attach hash keys to every entity in the model
    ///
    /// Regenerating replaces existing definitions, so running twice is a no-op.
    pub fn generate(&self, model: &mut DataVaultModel) {
        for hub in model.hubs.values_mut() {
            hub.hash_key = Some(self.hub_key(&hub.name, &hub.business_keys));
        }

        // Hub keys as carried by each Link, computed before borrowing links mutably
        let hub_keys: Vec<(String, Vec<HashKeyColumn>)> = model
            .links
            .values()
            .map(|link| {
                let keys = link
                    .related_hubs
                    .iter()
                    .filter_map(|name| model.hubs.get(name))
                    .map(|hub| {
                        let carried: Vec<&String> = hub
                            .business_keys
                            .iter()
                            .filter(|k| link.business_keys.contains(k))
                            .collect();
                        HashKeyColumn::new(self.naming.hash_key_name(&hub.name), HashKeyType::HashKeyHub, carried)
                            .with_parent(&hub.name)
                    })
                    .collect();
                (link.name.clone(), keys)
            })
            .collect();

        for (name, keys) in hub_keys {
            if let Some(link) = model.links.get_mut(&name) {
                link.hash_key = Some(HashKeyColumn::new(
                    self.naming.hash_key_name(&link.name),
                    HashKeyType::HashKeyLnk,
                    &link.business_keys,
                ));
                link.hub_hash_keys = keys;
            }
        }

        for satellite in model.satellites.values_mut().chain(model.link_satellites.values_mut()) {
            satellite.hash_key = Some(
                HashKeyColumn::new(
                    self.naming.hash_key_name(&satellite.name),
                    HashKeyType::HashKeySat,
                    &satellite.business_keys,
                )
                .with_parent(&satellite.parent),
            );
            satellite.hash_diff = Some(HashDiffColumn::new(
                self.naming.hash_diff_column.clone(),
                &satellite.descriptive_attrs,
            ));
        }

        tracing::info!(entities = model.entity_count(), "hash keys generated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use vaultsmith_core::{Hub, Link, Satellite};

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn model() -> DataVaultModel {
        let mut model = DataVaultModel::new();
        model.add_hub(Hub::new("HUB_CUSTOMER", keys(&["UNIQUE_ID_VALUE", "CUSTOMER_NO"]), keys(&["STTM_CUSTOMER"])));
        model.add_hub(Hub::new("HUB_ADDRESS", keys(&["COUNTRY", "ADDRESS_LINE1"]), keys(&["STTM_CUSTOMER"])));
        model.add_link(Link::new(
            "LNK_CUSTOMER_ADDRESS",
            keys(&["HUB_CUSTOMER", "HUB_ADDRESS"]),
            keys(&["CUSTOMER_NO", "ADDRESS_LINE1", "COUNTRY"]),
            keys(&["STTM_CUSTOMER"]),
        ));
        model.add_satellite(Satellite::new(
            "SAT_CUSTOMER",
            "HUB_CUSTOMER",
            keys(&["UNIQUE_ID_VALUE", "CUSTOMER_NO"]),
            keys(&["RISK_PROFILE", "FAX_NUMBER"]),
            "STTM_CUSTOMER",
        ));
        model
    }

    #[test]
    fn hub_keys_are_canonical_and_parentless() {
        let mut model = model();
        HashKeyGenerator::new(&NamingConfig::default()).generate(&mut model);

        let key = model.hubs["HUB_CUSTOMER"].hash_key.clone().unwrap();
        assert_eq!(key.target_name, "dv_hkey_hub_customer");
        assert_eq!(key.key_type, HashKeyType::HashKeyHub);
        assert_eq!(key.parent, None);
        assert_eq!(key.source_columns, keys(&["CUSTOMER_NO", "UNIQUE_ID_VALUE"]));
    }

    #[test]
    fn link_carries_hub_keys() {
        let mut model = model();
        HashKeyGenerator::new(&NamingConfig::default()).generate(&mut model);

        let link = &model.links["LNK_CUSTOMER_ADDRESS"];
        let key = link.hash_key.as_ref().unwrap();
        assert_eq!(key.key_type, HashKeyType::HashKeyLnk);
        assert_eq!(key.source_columns, keys(&["ADDRESS_LINE1", "COUNTRY", "CUSTOMER_NO"]));

        // UNIQUE_ID_VALUE is not on the Link, so it is not a hash input
        let customer = &link.hub_hash_keys[0];
        assert_eq!(customer.parent.as_deref(), Some("HUB_CUSTOMER"));
        assert_eq!(customer.source_columns, keys(&["CUSTOMER_NO"]));
    }

    #[test]
    fn satellite_key_points_at_parent() {
        let mut model = model();
        HashKeyGenerator::new(&NamingConfig::default()).generate(&mut model);

        let sat = &model.satellites["SAT_CUSTOMER"];
        let key = sat.hash_key.as_ref().unwrap();
        assert_eq!(key.target_name, "dv_hkey_sat_customer");
        assert_eq!(key.parent.as_deref(), Some("HUB_CUSTOMER"));

        let diff = sat.hash_diff.as_ref().unwrap();
        assert_eq!(diff.target_name, "dv_hsh_diff");
        assert_eq!(diff.source_columns, keys(&["FAX_NUMBER", "RISK_PROFILE"]));
    }

    #[test]
    fn declaration_order_does_not_change_hashes() {
        let naming = NamingConfig::default();
        let generator = HashKeyGenerator::new(&naming);
        let a = generator.hub_key("HUB_CUSTOMER", &keys(&["CUSTOMER_NO", "UNIQUE_ID_VALUE"]));
        let b = generator.hub_key("HUB_CUSTOMER", &keys(&["UNIQUE_ID_VALUE", "CUSTOMER_NO"]));

        let row: BTreeMap<String, String> = [("CUSTOMER_NO", "42"), ("UNIQUE_ID_VALUE", "X-1")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(a.compute(&row), b.compute(&row));
    }

    #[test]
    fn generation_is_idempotent() {
        let naming = NamingConfig::default();
        let generator = HashKeyGenerator::new(&naming);
        let mut once = model();
        generator.generate(&mut once);
        let mut twice = once.clone();
        generator.generate(&mut twice);
        assert_eq!(once, twice);
    }
}
