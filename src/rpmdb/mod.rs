// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Production lookups: extracts RPM databases from images and queries their signatures.

mod command;
mod extractor;
mod query;

pub use command::{run_with_timeout, CommandError, DEFAULT_COMMAND_TIMEOUT};
pub use extractor::{OcImageExtractor, RPMDB_LOCATIONS};
pub use query::{parse_unsigned, RpmQueryInspector, QUERY_FORMAT};
