/*!
Collision root module.

The three collision stages run once per tick, in this order:

- broad:        AABB refresh and the pairwise candidate scan
- narrow_phase: exact shape tests (SAT for boxes, closest point for spheres)
- response:     impulse, angular kick and positional correction per contact

Each stage reads and writes the entity store directly and passes pairs to the
next through buffers owned by the world.
*/

pub mod broad;
pub mod narrow_phase;
pub mod response;

// Re-export commonly used functions.
pub use broad::{aabb_intersects, collect_candidate_pairs, compute_aabb, refresh_aabbs};
pub use narrow_phase::{confirm_pairs, shapes_overlap};
pub use response::resolve_contacts;
