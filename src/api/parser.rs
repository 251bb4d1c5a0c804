// src/api/parser.rs
//! Parsing wire JSON into the domain model.
//!
//! The transport hands over loose `serde_json::Value`s; this module maps
//! them onto the closed model. Unknown block types are not errors — they
//! degrade to `BlockPayload::Unknown` carrying their raw payload, so one
//! exotic block never sinks a document.

use crate::error::AppError;
use crate::model::{Block, BlockPayload, DataSourceRef, Database, PageHandle};
use crate::types::{Annotations, Link, RichTextSpan, SpanKind};
use super::pagination::Paginated;
use serde_json::Value;

/// Parses one block object.
pub fn parse_block(value: &Value) -> Result<Block, AppError> {
    let id = required_id(value, "id")?;
    let has_children = value["has_children"].as_bool().unwrap_or(false);
    let archived = value["archived"].as_bool().unwrap_or(false);

    let block_type = value["type"]
        .as_str()
        .ok_or_else(|| AppError::MalformedResponse("block without a type field".to_string()))?;
    let body = &value[block_type];

    let payload = match block_type {
        "paragraph" => BlockPayload::Paragraph {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "heading_1" => BlockPayload::Heading1 {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "heading_2" => BlockPayload::Heading2 {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "heading_3" => BlockPayload::Heading3 {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "bulleted_list_item" => BlockPayload::BulletedListItem {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "numbered_list_item" => BlockPayload::NumberedListItem {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "to_do" => BlockPayload::ToDo {
            rich_text: parse_rich_text(&body["rich_text"]),
            checked: body["checked"].as_bool().unwrap_or(false),
        },
        "toggle" => BlockPayload::Toggle {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "quote" => BlockPayload::Quote {
            rich_text: parse_rich_text(&body["rich_text"]),
        },
        "callout" => BlockPayload::Callout {
            rich_text: parse_rich_text(&body["rich_text"]),
            icon: body["icon"]["emoji"].as_str().map(str::to_string),
        },
        "code" => BlockPayload::Code {
            rich_text: parse_rich_text(&body["rich_text"]),
            language: body["language"].as_str().unwrap_or("").to_string(),
        },
        "divider" => BlockPayload::Divider,
        "child_page" => BlockPayload::ChildPage {
            title: body["title"].as_str().unwrap_or("Untitled").to_string(),
        },
        other => {
            log::debug!("Unrecognized block type '{}', keeping raw payload", other);
            BlockPayload::Unknown {
                block_type: other.to_string(),
                data: body.clone(),
            }
        }
    };

    Ok(Block {
        id,
        has_children,
        archived,
        payload,
    })
}

/// Parses a rich text array. Malformed entries are dropped, not fatal.
pub fn parse_rich_text(value: &Value) -> Vec<RichTextSpan> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items.iter().filter_map(parse_span).collect()
}

fn parse_span(item: &Value) -> Option<RichTextSpan> {
    let plain_text = item["plain_text"].as_str().unwrap_or("").to_string();
    let href = item["href"].as_str().map(str::to_string);
    let annotations = parse_annotations(&item["annotations"]);

    let kind = match item["type"].as_str()? {
        "text" => SpanKind::Text {
            content: item["text"]["content"]
                .as_str()
                .unwrap_or(&plain_text)
                .to_string(),
            link: item["text"]["link"]["url"]
                .as_str()
                .map(|url| Link {
                    url: url.to_string(),
                }),
        },
        "mention" => SpanKind::Mention,
        "equation" => SpanKind::Equation {
            expression: item["equation"]["expression"]
                .as_str()
                .unwrap_or(&plain_text)
                .to_string(),
        },
        other => {
            log::debug!("Unrecognized rich text type '{}', using plain text", other);
            SpanKind::Text {
                content: plain_text.clone(),
                link: None,
            }
        }
    };

    Some(RichTextSpan {
        kind,
        plain_text,
        href,
        annotations,
    })
}

fn parse_annotations(value: &Value) -> Annotations {
    Annotations {
        bold: value["bold"].as_bool().unwrap_or(false),
        italic: value["italic"].as_bool().unwrap_or(false),
        strikethrough: value["strikethrough"].as_bool().unwrap_or(false),
        underline: value["underline"].as_bool().unwrap_or(false),
        code: value["code"].as_bool().unwrap_or(false),
    }
}

/// Parses one page of a block-children listing.
pub fn parse_block_page(value: &Value) -> Result<Paginated<Block>, AppError> {
    let results = value["results"]
        .as_array()
        .ok_or_else(|| AppError::MalformedResponse("list response without results".to_string()))?
        .iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated {
        results,
        next_cursor: value["next_cursor"].as_str().map(str::to_string),
        has_more: value["has_more"].as_bool().unwrap_or(false),
    })
}

/// Parses a database object, data sources included (possibly none).
pub fn parse_database(value: &Value) -> Result<Database, AppError> {
    let data_sources = value["data_sources"]
        .as_array()
        .map(|sources| {
            sources
                .iter()
                .map(|source| {
                    Ok(DataSourceRef {
                        id: required_id(source, "id")?,
                        name: source["name"].as_str().unwrap_or("").to_string(),
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()
        })
        .transpose()?
        .unwrap_or_default();

    let title = parse_rich_text(&value["title"])
        .iter()
        .map(|span| span.plain_text.as_str())
        .collect::<String>();

    Ok(Database {
        id: required_id(value, "id")?,
        title,
        data_sources,
        archived: value["archived"].as_bool().unwrap_or(false),
    })
}

/// Parses a page object down to the handle this core cares about.
pub fn parse_page_handle(value: &Value) -> Result<PageHandle, AppError> {
    Ok(PageHandle {
        id: required_id(value, "id")?,
        archived: value["archived"].as_bool().unwrap_or(false),
        properties: value["properties"].clone(),
    })
}

fn required_id<T>(value: &Value, field: &str) -> Result<crate::types::Id<T>, AppError> {
    let raw = value[field]
        .as_str()
        .ok_or_else(|| AppError::MalformedResponse(format!("object without an {} field", field)))?;
    crate::types::Id::parse(raw)
        .map_err(|e| AppError::MalformedResponse(format!("unparseable {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn parses_a_paragraph_block() {
        let value = json!({
            "object": "block",
            "id": ID,
            "type": "paragraph",
            "has_children": false,
            "archived": false,
            "paragraph": {
                "rich_text": [{
                    "type": "text",
                    "text": {"content": "Hello", "link": null},
                    "plain_text": "Hello",
                    "href": null,
                    "annotations": {
                        "bold": true, "italic": false, "strikethrough": false,
                        "underline": false, "code": false, "color": "default"
                    }
                }],
                "color": "default"
            }
        });

        let block = parse_block(&value).unwrap();
        assert_eq!(block.type_name(), "paragraph");
        let spans = block.rich_text().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].plain_text, "Hello");
        assert!(spans[0].annotations.bold);
    }

    #[test]
    fn unknown_block_types_keep_their_raw_payload() {
        let value = json!({
            "id": ID,
            "type": "synced_block",
            "has_children": true,
            "synced_block": {"synced_from": null}
        });

        let block = parse_block(&value).unwrap();
        assert_eq!(block.type_name(), "synced_block");
        assert!(block.has_children);
        assert!(matches!(
            block.payload,
            BlockPayload::Unknown { ref data, .. } if data["synced_from"].is_null()
        ));
    }

    #[test]
    fn missing_annotations_default_to_unstyled() {
        let spans = parse_rich_text(&json!([{
            "type": "text",
            "text": {"content": "bare"},
            "plain_text": "bare",
            "annotations": null
        }]));
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].annotations.any());
    }

    #[test]
    fn parses_a_database_with_data_sources() {
        let value = json!({
            "object": "database",
            "id": ID,
            "title": [{"type": "text", "text": {"content": "Notes"}, "plain_text": "Notes"}],
            "data_sources": [
                {"id": "650e8400-e29b-41d4-a716-446655440000", "name": "Primary"},
                {"id": "750e8400-e29b-41d4-a716-446655440000", "name": "Archive"}
            ],
            "archived": false
        });

        let database = parse_database(&value).unwrap();
        assert_eq!(database.title, "Notes");
        assert_eq!(database.data_sources.len(), 2);
        assert_eq!(database.data_sources[0].name, "Primary");
    }

    #[test]
    fn database_without_data_sources_parses_empty() {
        let value = json!({"id": ID, "title": [], "archived": false});
        let database = parse_database(&value).unwrap();
        assert!(database.data_sources.is_empty());
    }

    #[test]
    fn parses_a_block_listing_page() {
        let value = json!({
            "object": "list",
            "results": [
                {"id": ID, "type": "divider", "divider": {}}
            ],
            "next_cursor": "abc",
            "has_more": true
        });

        let page = parse_block_page(&value).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert!(page.has_more);
    }
}
