//! Token model for RSML lines
//!
//! RSML is line oriented: every source line lexes into at most eight tokens,
//! and no token owns text. A [`Token`] is a [`TokenKind`] plus a [`TextRange`]
//! into whichever buffer the cursor held when the line was lexed, so the
//! pipeline allocates nothing per token and resolves text only when a stage
//! needs it (validation, matching, formatting).
//!
//! ## Key Components
//!
//! - **[`TokenKind`]** - the closed set of 22 kinds; discriminants double as
//!   the C ABI byte encoding
//! - **[`TextRange`]** - byte offsets, with [`TextRange::NONE`] marking
//!   synthesized tokens (inserted wildcards, terminators)
//! - **[`Line`]** - fixed 8-slot container whose occupied slots always form
//!   a contiguous prefix
//! - **[`vocabulary`]** - the closed vocabularies (systems, architectures,
//!   comparators, keywords, built-in special actions)
//!
//! ## Canonical shapes
//!
//! After normalization a logic path is either
//! `[op, system, version, architecture, value]` or
//! `[op, system, comparator, version, architecture, value]`, followed by an
//! `Eol` terminator. Comments are `[#, text, Eol]` and special actions are
//! `[@, name, argument, Eol]`.

pub mod line;
pub mod token;
pub mod vocabulary;

pub use line::{Line, LineOverflow, LINE_CAPACITY};
pub use token::{TextRange, Token, TokenKind};
