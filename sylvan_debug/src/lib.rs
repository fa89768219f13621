// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debugging tools for sylvan scenes.
//!
//! - [`pretty`]: a [`TraceSink`](sylvan_core::trace::TraceSink) writing one
//!   human-readable line per event.
//! - [`chrome`]: a sink collecting events as Chrome Trace Event Format JSON.
//! - [`dump`]: an indented text dump of a branch of the node tree.
//!
//! Sinks are handed to [`Scene::set_trace_sink`](sylvan_core::scene::Scene::set_trace_sink).
//! To read them back afterwards, share them through an
//! `Rc<RefCell<_>>`, which is itself a sink.

pub mod chrome;
pub mod dump;
pub mod pretty;
