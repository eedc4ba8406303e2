//! Lift and place rules for blocks
//!
//! Each block is either placed (present in the placement order) or lifted
//! (in the inventory). The transitions are physical: a sheet of paper under
//! another overlapping sheet cannot be pulled out, a sheet the player is
//! standing on cannot be pulled out, and a sheet cannot be put down on top
//! of the player. The base layer never transitions at all.
//!
//! Every call is one transition. Rejections return `false` and mutate
//! nothing; there is no batching, so "lift two stacked sheets at once" is
//! simply two calls, each re-checked against the state the first produced.

use crate::maze::layer::{LayerId, LayerKind};
use crate::maze::state::{MazeState, Mode};

impl MazeState {
    /// Take a placed block out of the world and into the inventory.
    ///
    /// Fails if the block is not placed, if any placed layer above it
    /// overlaps its rect (it is physically covered), or, during play, if
    /// the player is standing inside its rect. The player check only
    /// matters once the cover check has passed: an exposed block is the
    /// topmost sheet wherever the player stands on it.
    pub fn lift_block(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.store.layer(id) else {
            return false;
        };
        if layer.kind == LayerKind::Base {
            log::warn!("refusing to lift base layer {id:?}");
            return false;
        }
        let Some(idx) = self.placed_ids.iter().position(|pid| *pid == id) else {
            return false;
        };

        let rect = layer.rect;
        let covered = self.placed_ids[idx + 1..]
            .iter()
            .filter_map(|pid| self.store.layer(*pid))
            .any(|above| rect.overlaps(&above.rect));
        if covered {
            log::debug!("lift {id:?} rejected: covered by a layer above");
            return false;
        }

        if self.mode == Mode::Playing && rect.contains(self.player_pos) {
            log::debug!("lift {id:?} rejected: player stands on it");
            return false;
        }

        self.placed_ids.remove(idx);
        log::debug!("lifted {id:?}");
        true
    }

    /// Put a block down on top of the stack.
    ///
    /// During play this fails if the block's rect contains the player
    /// (placing a solid sheet onto the player would crush or trap them).
    /// In editing mode there is no positional restriction; only block
    /// creation guards the start/end points. Re-placing an already placed
    /// block just moves it to the top.
    pub fn place_block(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.store.layer(id) else {
            return false;
        };
        if layer.kind == LayerKind::Base {
            log::warn!("refusing to re-place base layer {id:?}");
            return false;
        }

        if self.mode == Mode::Playing && layer.rect.contains(self.player_pos) {
            log::debug!("place {id:?} rejected: would cover the player");
            return false;
        }

        self.placed_ids.retain(|pid| *pid != id);
        self.placed_ids.push(id);
        log::debug!("placed {id:?} on top");
        true
    }
}
