// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Output options chosen when the service is initialized.

use serde::{Deserialize, Serialize};

/// How records are rendered and where, besides files, they are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Mirror every line to standard output.
    pub console: bool,
    /// Color console lines by severity. Ignored in structured mode.
    pub colors: bool,
    /// Render one JSON object per line instead of the bracketed text form.
    pub structured: bool,
}

impl FormatOptions {
    /// Creates options from the three initialization flags.
    pub const fn new(console: bool, colors: bool, structured: bool) -> Self {
        Self {
            console,
            colors,
            structured,
        }
    }

    /// Whether console lines get ANSI color codes.
    pub const fn colored_console(&self) -> bool {
        self.colors && !self.structured
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(true, true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_mode_disables_colors() {
        assert!(FormatOptions::new(true, true, false).colored_console());
        assert!(!FormatOptions::new(true, true, true).colored_console());
        assert!(!FormatOptions::new(true, false, false).colored_console());
    }
}
