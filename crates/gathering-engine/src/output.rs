//! Node selection and JSON-lines output.

use std::io::Write;

use gathering_nodes::{EorzeaTime, Node, NodeRegistry};
use gathering_types::ClientLanguage;
use tracing::debug;

use crate::config::DisplayConfig;
use crate::error::EngineError;

/// Nodes matching the display filters, in node order.
pub fn select<'a>(
    registry: &'a NodeRegistry,
    display: &DisplayConfig,
    time: EorzeaTime,
) -> Vec<&'a Node> {
    registry.find(&display.items, display.only_up.then_some(time))
}

/// Item names of a node in `language`, falling back to English.
pub fn localized_items(node: &Node, language: ClientLanguage) -> Vec<String> {
    node.items()
        .iter()
        .map(|item| {
            item.name(language)
                .map_or_else(|| item.to_string(), str::to_owned)
        })
        .collect()
}

/// Write one JSON summary per line.
pub fn write_summaries<W: Write>(
    out: &mut W,
    nodes: &[&Node],
    display: &DisplayConfig,
    time: EorzeaTime,
) -> Result<usize, EngineError> {
    let language = display.language;
    let mut written = 0_usize;
    for node in nodes {
        debug!(
            node = %node.id(),
            items = ?localized_items(node, language),
            hours_until_up = ?node.times().hours_until_up(time.hour()),
            "Writing node"
        );
        serde_json::to_writer(&mut *out, &node.summary())?;
        writeln!(out)?;
        written = written.saturating_add(1);
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use gathering_types::GatheringData;

    use super::*;

    const DUMP: &str = r#"{
        "territories": [{ "id": 1, "name": "Mor Dhona" }],
        "items": [
            { "id": 1, "names": { "english": "Mythrite Ore", "french": "Minerai de mithrite" } },
            { "id": 2, "names": { "english": "Wind Shard" } }
        ],
        "point_bases": [
            { "id": 10, "gathering_type": 0, "level": 50, "items": [1, 2] },
            { "id": 20, "gathering_type": 0, "level": 50, "items": [1] }
        ],
        "points": [
            { "id": 100, "base": 10, "territory": 1 },
            {
                "id": 200, "base": 20, "territory": 1,
                "transient": { "ephemeral_start": 1200, "ephemeral_end": 1400 }
            }
        ]
    }"#;

    fn registry() -> NodeRegistry {
        GatheringData::from_json(DUMP)
            .ok()
            .and_then(|data| NodeRegistry::build(&data).ok())
            .unwrap_or_default()
    }

    fn ids(nodes: &[&Node]) -> Vec<u32> {
        nodes.iter().map(|n| n.id().into_inner()).collect()
    }

    #[test]
    fn select_without_filters_returns_everything() {
        let registry = registry();
        let midnight = EorzeaTime::from_hour_minute(0, 0);
        let nodes = select(&registry, &DisplayConfig::default(), midnight);
        assert_eq!(ids(&nodes), vec![10, 20]);
    }

    #[test]
    fn only_up_uses_the_evaluated_hour() {
        let registry = registry();
        let display = DisplayConfig {
            only_up: true,
            ..DisplayConfig::default()
        };
        let night = select(&registry, &display, EorzeaTime::from_hour_minute(3, 0));
        assert_eq!(ids(&night), vec![10]);
        let noon = select(&registry, &display, EorzeaTime::from_hour_minute(12, 30));
        assert_eq!(ids(&noon), vec![10, 20]);
    }

    #[test]
    fn item_filter_requires_every_item() {
        let registry = registry();
        let display = DisplayConfig {
            items: vec!["Wind Shard".to_owned()],
            ..DisplayConfig::default()
        };
        let nodes = select(&registry, &display, EorzeaTime::from_hour_minute(0, 0));
        assert_eq!(ids(&nodes), vec![10]);
    }

    #[test]
    fn localized_names_fall_back_to_english() {
        let registry = registry();
        let node = registry.iter().next();
        let names = node.map(|n| localized_items(n, ClientLanguage::French));
        assert_eq!(
            names,
            Some(vec!["Minerai de mithrite".to_owned(), "Wind Shard".to_owned()])
        );
    }

    #[test]
    fn writes_one_line_per_node() {
        let registry = registry();
        let nodes: Vec<&Node> = registry.iter().collect();
        let mut buffer = Vec::new();
        let written = write_summaries(
            &mut buffer,
            &nodes,
            &DisplayConfig::default(),
            EorzeaTime::from_hour_minute(0, 0),
        );
        assert_eq!(written.ok(), Some(2));
        let text = String::from_utf8(buffer).unwrap_or_default();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first = lines.first().copied().unwrap_or_default();
        assert!(first.contains("\"items\":\"Mythrite Ore|Wind Shard\""));
    }
}
