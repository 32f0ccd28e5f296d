use std::collections::HashMap;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// The screen a command acts on. Help lists groups in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandGroup {
    Entry,
    Report,
    Settings,
    System,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 4] = [
        CommandGroup::Entry,
        CommandGroup::Report,
        CommandGroup::Settings,
        CommandGroup::System,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CommandGroup::Entry => "Entry form",
            CommandGroup::Report => "Report",
            CommandGroup::Settings => "Settings",
            CommandGroup::System => "System",
        }
    }
}

pub struct CommandEntry {
    pub group: CommandGroup,
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub example: Option<&'static str>,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        group: CommandGroup,
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            group,
            name,
            description,
            usage,
            example: None,
            handler,
        }
    }

    pub fn with_example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }
}

/// Shell commands indexed by name. Re-registering a name replaces the entry in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.index.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Non-empty groups in display order, each with its commands in registration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        CommandGroup::ALL
            .into_iter()
            .map(|group| {
                let members = self
                    .entries
                    .iter()
                    .filter(|entry| entry.group == group)
                    .collect::<Vec<_>>();
                (group, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    /// Command names ordered by group.
    pub fn names(&self) -> Vec<&'static str> {
        self.grouped()
            .into_iter()
            .flat_map(|(_, members)| members.into_iter().map(|entry| entry.name))
            .collect()
    }
}
