//! Executes the sub-commands of a struck region's `command` tag.

use crate::surface::AudioPlayer;
use range_model::{parse_command_tag, Hit, RegionCommand, RegionKind, Target};
use std::path::Path;
use tracing::debug;

/// Run every sub-command on the struck region's `command` tag.
///
/// Returns `true` when a `reset` sub-command was seen; the caller performs
/// the reset after the resolution pass completes so it never reenters an
/// in-flight scan. Unrecognized command names are ignored.
pub(crate) fn execute_region_commands(
    targets: &mut [Target],
    hit: &Hit,
    audio: Option<&dyn AudioPlayer>,
) -> bool {
    let Some(tag) = targets[hit.target_index].regions()[hit.region_index]
        .tag("command")
        .map(str::to_owned)
    else {
        return false;
    };
    if tag.is_empty() {
        return false;
    }

    let mut reset_requested = false;

    for RegionCommand { name, args } in parse_command_tag(&tag) {
        match name.as_str() {
            "reset" => reset_requested = true,
            "animate" => {
                if let Some(image_region) =
                    targets[hit.target_index].regions_mut()[hit.region_index].as_image_mut()
                {
                    image_region.advance(&args);
                }
            }
            "reverse" => {
                if let Some(image_region) =
                    targets[hit.target_index].regions_mut()[hit.region_index].as_image_mut()
                {
                    image_region.reverse();
                    image_region.advance(&args);
                }
            }
            "play_sound" => {
                if suppress_sound(targets, hit, &args) {
                    continue;
                }
                if let (Some(player), Some(path)) = (audio, args.first()) {
                    player.play(Path::new(path));
                }
            }
            other => debug!("ignoring unrecognized region command: {}", other),
        }
    }

    reset_requested
}

/// A second `play_sound` argument names a region whose image animation being
/// off its first frame suppresses the cue: don't play the fall sound when the
/// plate is already down.
fn suppress_sound(targets: &[Target], hit: &Hit, args: &[String]) -> bool {
    if args.len() != 2 {
        return false;
    }
    let Some(named) = Target::region_by_name(targets, hit.target_index, &args[1]) else {
        return false;
    };
    match named.kind() {
        RegionKind::Image(image_region) => !image_region.on_first_frame(),
        RegionKind::Shape(_) => false,
    }
}
