//! Landing resolution against the platform field
//!
//! Platforms are one-way: the player only lands while falling or at rest, so
//! jumping up through a platform from below is allowed. The first platform in
//! collection order that catches the player wins; platforms rarely overlap
//! vertically, so this matches nearest-platform resolution in practice.

use super::state::{Platform, Player};
use crate::settings::Tuning;

/// Whether the player's horizontal span overlaps the platform's
#[inline]
pub fn overlaps_horizontally(player: &Player, platform: &Platform) -> bool {
    (player.position.x - platform.position.x).abs()
        < player.half_extents.x + platform.half_extents.x
}

/// Whether a falling player's bottom face is in the landing band of `platform`
///
/// The band runs from `tolerance` below the platform's bottom face up to its top.
#[inline]
pub fn in_landing_band(player: &Player, platform: &Platform, tolerance: f32) -> bool {
    let bottom = player.bottom();
    bottom <= platform.top() && bottom >= platform.bottom() - tolerance
}

/// Snap the player onto the first platform it lands on this frame
///
/// Returns the index of that platform. Updates `grounded` either way.
pub fn resolve(player: &mut Player, platforms: &[Platform], tuning: &Tuning, dt: f32) -> Option<usize> {
    if player.velocity.y > 0.0 {
        player.grounded = false;
        return None;
    }

    // Widen by this frame's fall so a fast drop can't skip a thin platform.
    let tolerance = tuning.landing_tolerance + player.velocity.y.abs() * dt;

    let hit = platforms
        .iter()
        .position(|platform| overlaps_horizontally(player, platform) && in_landing_band(player, platform, tolerance));

    match hit {
        Some(index) => {
            player.position.y = platforms[index].top() + player.half_extents.y;
            player.velocity.y = 0.0;
            player.grounded = true;
        }
        None => player.grounded = false,
    }

    hit
}
