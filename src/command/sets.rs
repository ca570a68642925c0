// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Static command membership sets
//!
//! A single definition shared by the terminal client and the command service
//! so both sides classify input identically.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use super::{AnimationKind, ArtForm};

/// Commands that are refused outright, even when also listed as valid.
const DANGEROUS_COMMANDS: &[&str] = &[
    "rm",
    "chmod",
    "chown",
    "sudo",
    "su",
    "dd",
    "mkfs",
    "fdisk",
    "mount",
    "umount",
    "systemctl",
    "service",
    "kill",
    "pkill",
    ":(){:|:&};:",
];

/// Commands the simulated shell recognises.
const VALID_COMMANDS: &[&str] = &[
    // Files and directories
    "ls", "ll", "la", "l", "pwd", "cd", "mkdir", "touch", "find", "rm", "mv", "cp",
    // Fun commands
    "cowsay", "sl", "fortune", "cmatrix", "asciiquarium", "dashboard", "oneko",
    // File contents
    "cat", "head", "tail", "less", "more", "grep", "wc", "sort", "uniq",
    // System information
    "date", "cal", "uptime", "whoami", "who", "w", "id", "uname", "hostname", "domainname",
    "dnsdomainname",
    // Processes
    "ps", "pstree", "top", "htop", "kill", "pkill",
    // Resources
    "free", "df", "du", "iostat", "vmstat",
    // Network
    "ping", "netstat", "ss", "ip", "ifconfig", "host", "dig", "nslookup",
    // Text processing
    "echo", "printf", "sed", "awk", "cut", "tr", "diff", "cmp",
    // Archives
    "tar", "gzip", "gunzip", "zip", "unzip", "bzip2", "bunzip2",
    // Users and permissions
    "groups", "users", "last", "finger", "chmod", "chown", "sudo", "su",
    // Utilities
    "clear", "help", "history", "alias", "type", "which", "whereis", "man", "info", "whatis",
    "apropos",
    // Transfer
    "scp", "rsync", "ftp", "sftp", "curl", "wget",
    // Editors
    "nano", "vim", "vi",
    // System administration
    "dd", "mkfs", "fdisk", "mount", "umount", "systemctl", "service",
];

/// CJK unified ideographs; input containing them is not a shell command.
pub const FOREIGN_SCRIPT: RangeInclusive<char> = '\u{4e00}'..='\u{9fa5}';

/// Immutable membership configuration consumed by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSets {
    /// Token that empties the transcript
    pub clear_token: String,
    /// Token that prints the help listing
    pub help_token: String,
    /// Animations with on/off toggle semantics
    pub toggles: BTreeMap<String, AnimationKind>,
    /// Timed or until-dismissed visual effects
    pub animations: BTreeMap<String, AnimationKind>,
    /// Commands answered with generated art or literature
    pub ascii_art: BTreeMap<String, ArtForm>,
    /// Commands refused regardless of validity
    pub dangerous: BTreeSet<String>,
    /// Commands the shell recognises
    pub valid: BTreeSet<String>,
    /// Characters that mark input as unsupported
    pub foreign_script: RangeInclusive<char>,
}

impl Default for CommandSets {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandSets {
    /// The command sets used by both the terminal and the service.
    pub fn standard() -> Self {
        let toggles = BTreeMap::from([("oneko".to_string(), AnimationKind::Pet)]);
        let animations = BTreeMap::from([
            ("sl".to_string(), AnimationKind::Train),
            ("cmatrix".to_string(), AnimationKind::Matrix),
            ("asciiquarium".to_string(), AnimationKind::Aquarium),
            ("dashboard".to_string(), AnimationKind::Dashboard),
        ]);
        let ascii_art = BTreeMap::from([
            ("cowsay".to_string(), ArtForm::Figure),
            ("fortune".to_string(), ArtForm::Poem),
            ("cal".to_string(), ArtForm::Calendar),
        ]);

        Self {
            clear_token: "clear".to_string(),
            help_token: "help".to_string(),
            toggles,
            animations,
            ascii_art,
            dangerous: DANGEROUS_COMMANDS.iter().map(|s| s.to_string()).collect(),
            valid: VALID_COMMANDS.iter().map(|s| s.to_string()).collect(),
            foreign_script: FOREIGN_SCRIPT,
        }
    }

    /// Whether any character of `text` falls into the unsupported script range.
    pub fn contains_foreign_script(&self, text: &str) -> bool {
        text.chars().any(|c| self.foreign_script.contains(&c))
    }

    pub fn is_dangerous(&self, token: &str) -> bool {
        self.dangerous.contains(token)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.valid.contains(token)
    }
}
