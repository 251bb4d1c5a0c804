// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell the story of how the client operates: how much it
//! fetches per round-trip, how deep it recurses, how patiently it retries.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The API maximum is 100. We use the maximum to minimize round-trips
/// during recursive fetching.
pub const API_PAGE_SIZE: u32 = 100;

/// The protocol version sent with every request.
pub const API_VERSION: &str = "2025-09-03";

/// Base URL for all API requests.
pub const API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Retry boundaries
// ---------------------------------------------------------------------------

/// Default number of retries after the initial attempt.
///
/// Three retries with exponential backoff (1s/2s/4s) bounds the worst case
/// at ~7 seconds of waiting beyond base request latency per call. Deep
/// trees compound this multiplicatively, which is why sibling child
/// fetches run concurrently.
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// Base delay for exponential backoff. Retry `n` waits `base * 2^n`.
pub const BACKOFF_BASE_SECS: u64 = 1;

// ---------------------------------------------------------------------------
// Materialization boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when recursively materializing block trees.
///
/// Notion content can nest arbitrarily deep. Blocks at this depth are
/// marked incomplete rather than recursed into, so a pathological tree
/// degrades instead of overflowing the stack.
pub const MAX_FETCH_DEPTH: usize = 50;

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Number of spaces per indentation level in converted markdown.
pub const INDENT_SPACES: usize = 2;

/// Estimated characters per block, used to pre-allocate output strings.
///
/// A performance hint, not a constraint. Over-estimating wastes a little
/// memory; under-estimating causes reallocation.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;
