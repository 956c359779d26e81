//! Intent proposer
//!
//! Drafts a `GroupingIntent` from classification alone. The draft is a
//! starting point for the caller to edit, not a finished model.

use vaultsmith_core::{Config, GroupingIntent, HubIntent, LinkIntent, LinkSatelliteIntent, SatelliteIntent};

use crate::classifier::ClassifiedTable;

/// Propose a grouping intent for a set of classified tables
///
/// - one Hub per table with business-key candidates (`HUB_<TABLE>`)
/// - one Hub per relationship-key candidate, named after the column with its
///   key token removed (`EXT_REF_NO` -> `HUB_EXT_REF`)
/// - one Link per (table Hub, relationship Hub) pair, or one Link over all
///   relationship Hubs of a table without a Hub of its own
/// - one Satellite (or Link-Satellite) holding the descriptive columns
pub fn propose_intent(classified: &[ClassifiedTable], config: &Config) -> GroupingIntent {
    let naming = &config.naming;
    let mut intent = GroupingIntent::default();

    for table in classified {
        let table_name = table.name();
        let business_keys = table.business_key_candidates();

        let table_hub = if business_keys.is_empty() {
            None
        } else {
            let name = format!("{}{}", naming.hub_prefix, table_name);
            add_hub(&mut intent, &name, &business_keys, table_name);
            Some(name)
        };

        let mut relationship_hubs = Vec::new();
        for column in table.relationship_key_candidates() {
            let stem = key_stem(column, config);
            let mut name = format!("{}{}", naming.hub_prefix, stem);
            if !add_hub(&mut intent, &name, &[column], table_name) {
                // Same stem already taken by a Hub over other keys
                name = format!("{}{}", naming.hub_prefix, column);
                add_hub(&mut intent, &name, &[column], table_name);
            }
            relationship_hubs.push((stem, name));
        }

        let mut table_links = Vec::new();
        match &table_hub {
            Some(hub) => {
                for (stem, related) in &relationship_hubs {
                    let name = format!("{}{}_{}", naming.link_prefix, table_name, stem);
                    intent.links.push(LinkIntent {
                        name: name.clone(),
                        related_hubs: vec![hub.clone(), related.clone()],
                        business_keys: None,
                        source_tables: vec![table_name.to_string()],
                        description: format!("{} references {}", table_name, related),
                    });
                    table_links.push(name);
                }
            }
            None if relationship_hubs.len() >= 2 => {
                let name = format!("{}{}", naming.link_prefix, table_name);
                intent.links.push(LinkIntent {
                    name: name.clone(),
                    related_hubs: relationship_hubs.iter().map(|(_, hub)| hub.clone()).collect(),
                    business_keys: None,
                    source_tables: vec![table_name.to_string()],
                    description: format!("Association recorded in {}", table_name),
                });
                table_links.push(name);
            }
            None => {}
        }

        let descriptive: Vec<String> = table.descriptive().iter().map(|c| c.to_string()).collect();
        if descriptive.is_empty() {
            continue;
        }

        if let Some(hub) = &table_hub {
            intent.satellites.push(SatelliteIntent {
                name: format!("{}{}", naming.satellite_prefix, table_name),
                hub: hub.clone(),
                business_keys: None,
                source_table: table_name.to_string(),
                descriptive_attrs: Some(descriptive),
                description: format!("Descriptive attributes of {}", table_name),
            });
        } else if let [link] = table_links.as_slice() {
            intent.link_satellites.push(LinkSatelliteIntent {
                name: format!("{}{}", naming.link_satellite_prefix, table_name),
                link: link.clone(),
                business_keys: None,
                source_table: table_name.to_string(),
                descriptive_attrs: Some(descriptive),
                description: format!("Descriptive attributes of {}", table_name),
            });
        }
    }

    tracing::info!(
        hubs = intent.hubs.len(),
        links = intent.links.len(),
        satellites = intent.satellites.len(),
        link_satellites = intent.link_satellites.len(),
        "proposed grouping intent"
    );

    intent
}

/// Column name without its key token
fn key_stem(column: &str, config: &Config) -> String {
    let upper = column.to_ascii_uppercase();
    let stem = match config.classifier.key_token(column) {
        Some(token) => {
            let token = token.to_ascii_uppercase();
            upper
                .strip_suffix(token.as_str())
                .or_else(|| upper.strip_prefix(token.as_str()))
                .unwrap_or(&upper)
                .to_string()
        }
        None => upper.clone(),
    };

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        upper
    } else {
        stem.to_string()
    }
}

/// Add a Hub or merge the table into an identical one.
/// Returns false when the name is taken by a Hub with different keys.
fn add_hub(intent: &mut GroupingIntent, name: &str, keys: &[&str], table: &str) -> bool {
    if let Some(existing) = intent.hubs.iter_mut().find(|h| h.name == name) {
        if existing.business_keys.iter().map(String::as_str).ne(keys.iter().copied()) {
            return false;
        }
        if !existing.source_tables.iter().any(|t| t == table) {
            existing.source_tables.push(table.to_string());
        }
        return true;
    }

    intent.hubs.push(HubIntent {
        name: name.to_string(),
        business_keys: keys.iter().map(|k| k.to_string()).collect(),
        source_tables: vec![table.to_string()],
        description: String::new(),
    });
    true
}
