// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace watch loop and the reconciler it drives.

pub mod namespace;
pub mod watcher;

pub use namespace::NamespaceReconciler;
pub use watcher::{NamespaceEventHandler, NamespaceWatcher};
