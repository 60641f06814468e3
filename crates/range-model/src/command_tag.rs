use tracing::debug;

/// One parsed sub-command from a region's `command` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Parse a `command` tag value into its ordered sub-commands.
///
/// Sub-commands are separated by `;`, with an optional parenthesized
/// comma-separated argument list, e.g.
/// `animate(true);play_sound(sounds/steel.wav,plate_1)`.
///
/// Malformed sub-commands are skipped so a bad entry never aborts its
/// siblings.
pub fn parse_command_tag(tag: &str) -> Vec<RegionCommand> {
    let mut commands = Vec::new();

    for part in tag.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some(open) = part.find('(') else {
            commands.push(RegionCommand {
                name: part.to_string(),
                args: Vec::new(),
            });
            continue;
        };

        let name = part[..open].trim();
        if name.is_empty() || !part.ends_with(')') {
            debug!("skipping malformed sub-command: {}", part);
            continue;
        }

        let inner = &part[open + 1..part.len() - 1];
        let args = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|a| a.trim().to_string()).collect()
        };

        commands.push(RegionCommand {
            name: name.to_string(),
            args,
        });
    }

    commands
}
