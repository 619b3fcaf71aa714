// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

use cellar_core::Platform;

/// Merge a `common` list with the extra entries for `platform`
///
/// Common entries come first, followed by the platform specific ones.
#[must_use]
pub fn effective_list<T: Clone>(
    common: &[T],
    per_platform: &std::collections::BTreeMap<Platform, Vec<T>>,
    platform: Platform,
) -> Vec<T> {
    let mut result = common.to_vec();
    if let Some(extra) = per_platform.get(&platform) {
        result.extend_from_slice(extra);
    }
    result
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
