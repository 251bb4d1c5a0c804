// tests/conversion_pipeline.rs
//! End-to-end conversion tests against an in-memory document source.
//!
//! The pipeline under test: root fetch → materialize → convert →
//! plaintext. No network; the source serves scripted block trees,
//! paginated like the real API.

use async_trait::async_trait;
use notiondown::{
    convert_page, to_plaintext, Annotations, AppError, Block, BlockId, BlockPayload,
    ConvertedDocument, DataSourceId, Database, DatabaseId, DocumentSource, MarkdownDialect,
    PageHandle, PageId, Paginated, QueryRequest, RichTextSpan, INCOMPLETE_SUBTREE_MARKER,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const PAGE: &str = "550e8400e29b41d4a716446655440000";

/// Serves children from an in-memory tree, split into cursor pages to
/// exercise the walker. Ids listed in `broken` fail their child fetch;
/// `root_broken` fails the root listing itself.
#[derive(Default)]
struct ScriptedWorkspace {
    children: HashMap<String, Vec<Block>>,
    broken: Vec<String>,
    root_broken: bool,
}

impl ScriptedWorkspace {
    fn add_children(&mut self, parent: &BlockId, children: Vec<Block>) {
        self.children
            .insert(parent.as_str().to_string(), children);
    }
}

#[async_trait]
impl DocumentSource for ScriptedWorkspace {
    async fn get_page(&self, _: &PageId) -> Result<PageHandle, AppError> {
        unreachable!("conversion never fetches page metadata")
    }

    async fn create_page(
        &self,
        _: &DataSourceId,
        _: serde_json::Value,
    ) -> Result<PageHandle, AppError> {
        unreachable!("conversion never writes")
    }

    async fn update_page_properties(
        &self,
        _: &PageId,
        _: serde_json::Value,
    ) -> Result<PageHandle, AppError> {
        unreachable!("conversion never writes")
    }

    async fn get_database(&self, _: &DatabaseId) -> Result<Database, AppError> {
        unreachable!("conversion never resolves databases")
    }

    async fn query_data_source(
        &self,
        _: &DataSourceId,
        _: QueryRequest,
    ) -> Result<Paginated<PageHandle>, AppError> {
        unreachable!("conversion never queries rows")
    }

    async fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<String>,
    ) -> Result<Paginated<Block>, AppError> {
        if parent.as_str() == PAGE && self.root_broken {
            return Err(AppError::Api {
                status: 503,
                code: notiondown::ApiErrorCode::ServiceUnavailable,
                message: "workspace is down".to_string(),
                retry_after: None,
            });
        }
        if self.broken.contains(&parent.as_str().to_string()) {
            return Err(AppError::Transport("branch unreachable".to_string()));
        }

        let all = self
            .children
            .get(parent.as_str())
            .cloned()
            .unwrap_or_default();

        // Two-item pages: long sibling lists come back over several
        // cursors, exactly like the wire protocol.
        let start = cursor
            .as_deref()
            .map(|c| c.parse::<usize>().unwrap())
            .unwrap_or(0);
        let end = (start + 2).min(all.len());
        let has_more = end < all.len();

        Ok(Paginated {
            results: all[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}

fn page_id() -> PageId {
    PageId::parse(PAGE).unwrap()
}

fn span(text: &str) -> RichTextSpan {
    RichTextSpan::plain(text)
}

fn bold_span(text: &str) -> RichTextSpan {
    RichTextSpan::styled(
        text,
        Annotations {
            bold: true,
            ..Default::default()
        },
    )
}

fn italic_span(text: &str) -> RichTextSpan {
    RichTextSpan::styled(
        text,
        Annotations {
            italic: true,
            ..Default::default()
        },
    )
}

async fn convert(workspace: &ScriptedWorkspace) -> Result<ConvertedDocument, AppError> {
    convert_page(workspace, &page_id(), MarkdownDialect::Github).await
}

#[tokio::test]
async fn converts_a_simple_document_to_markdown_and_plaintext() {
    let mut workspace = ScriptedWorkspace::default();
    workspace.add_children(
        &(&page_id()).into(),
        vec![
            Block::leaf(BlockPayload::Heading1 {
                rich_text: vec![bold_span("Title")],
            }),
            Block::leaf(BlockPayload::Paragraph {
                rich_text: vec![span("Hello "), italic_span("world")],
            }),
        ],
    );

    let document = convert(&workspace).await.unwrap();
    assert_eq!(document.markdown, "# **Title**\nHello *world*\n");
    assert_eq!(document.plain_text, "Title\nHello world");
}

#[tokio::test]
async fn sibling_pages_stitch_in_cursor_order() {
    let mut workspace = ScriptedWorkspace::default();
    // Five paragraphs: served as pages of two, then two, then one.
    workspace.add_children(
        &(&page_id()).into(),
        (1..=5)
            .map(|n| {
                Block::leaf(BlockPayload::Paragraph {
                    rich_text: vec![span(&format!("p{}", n))],
                })
            })
            .collect(),
    );

    let document = convert(&workspace).await.unwrap();
    assert_eq!(document.markdown, "p1\np2\np3\np4\np5\n");
}

#[tokio::test]
async fn nested_lists_indent_and_children_fetch_on_demand() {
    let mut workspace = ScriptedWorkspace::default();
    let parent = Block::leaf(BlockPayload::BulletedListItem {
        rich_text: vec![span("outer")],
    })
    .with_children_flag();
    workspace.add_children(
        &parent.id,
        vec![Block::leaf(BlockPayload::BulletedListItem {
            rich_text: vec![span("inner")],
        })],
    );
    workspace.add_children(&(&page_id()).into(), vec![parent]);

    let document = convert(&workspace).await.unwrap();
    assert_eq!(document.markdown, "- outer\n  - inner\n");
    assert_eq!(document.plain_text, "outer\ninner");
}

#[tokio::test]
async fn a_broken_branch_degrades_instead_of_failing() {
    let mut workspace = ScriptedWorkspace::default();
    let healthy = Block::leaf(BlockPayload::Paragraph {
        rich_text: vec![span("healthy")],
    });
    let broken = Block::leaf(BlockPayload::Toggle {
        rich_text: vec![span("broken")],
    })
    .with_children_flag();
    workspace.broken.push(broken.id.as_str().to_string());
    workspace.add_children(&(&page_id()).into(), vec![healthy, broken]);

    let document = convert(&workspace).await.unwrap();
    assert!(document.markdown.contains("healthy"));
    assert!(document.markdown.contains(INCOMPLETE_SUBTREE_MARKER));
    // The marker is inert: plaintext carries no trace of it.
    assert!(!document.plain_text.contains("incomplete"));
}

#[tokio::test]
async fn a_root_fetch_failure_is_the_one_visible_error() {
    let workspace = ScriptedWorkspace {
        root_broken: true,
        ..Default::default()
    };

    let err = convert(&workspace).await.unwrap_err();
    assert!(matches!(err, AppError::Api { status: 503, .. }));
}

#[tokio::test]
async fn unknown_block_types_survive_conversion() {
    let mut workspace = ScriptedWorkspace::default();
    workspace.add_children(
        &(&page_id()).into(),
        vec![
            Block::leaf(BlockPayload::Unknown {
                block_type: "table_of_contents".to_string(),
                data: serde_json::json!({}),
            }),
            Block::leaf(BlockPayload::Paragraph {
                rich_text: vec![span("after")],
            }),
        ],
    );

    let document = convert(&workspace).await.unwrap();
    assert!(document.markdown.contains("table_of_contents"));
    assert!(document.markdown.contains("after"));
}

#[tokio::test]
async fn mixed_document_plaintext_is_idempotent() {
    let mut workspace = ScriptedWorkspace::default();
    workspace.add_children(
        &(&page_id()).into(),
        vec![
            Block::leaf(BlockPayload::Heading2 {
                rich_text: vec![span("Notes")],
            }),
            Block::leaf(BlockPayload::ToDo {
                rich_text: vec![span("follow up")],
                checked: true,
            }),
            Block::leaf(BlockPayload::Code {
                rich_text: vec![span("let x = 1;")],
                language: "rust".to_string(),
            }),
            Block::leaf(BlockPayload::Quote {
                rich_text: vec![span("cited")],
            }),
            Block::leaf(BlockPayload::Divider),
        ],
    );

    let document = convert(&workspace).await.unwrap();
    let once = to_plaintext(&document.markdown);
    assert_eq!(once, document.plain_text);
    assert_eq!(to_plaintext(&once), once);
    // Code is not narration: dropped, not kept.
    assert!(!document.plain_text.contains("let x = 1;"));
}
