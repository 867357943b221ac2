pub mod codec;
pub mod palette_registry;
pub mod run_supervisor;

pub use codec::{decode_png, encode_png};
pub use palette_registry::{
    InMemoryPaletteStore, PaletteSource, PaletteStore, StoredPalette, CUSTOM_PREFIX,
};
pub use run_supervisor::{ProgressEvent, RunOutcome, RunSupervisor, SupervisorPool};
