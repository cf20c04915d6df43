// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Frontdesk.
//!
//! [`MockProvider`] and [`MockSpeech`] implement the core adapter traits
//! with canned replies so gateway tests run without network access.

pub mod mock_provider;
pub mod mock_speech;

pub use mock_provider::{MockProvider, MockReply};
pub use mock_speech::MockSpeech;
