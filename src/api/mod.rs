pub mod headers;
pub mod palettes;
pub mod process;
pub mod progress;
pub mod strategies;

pub use palettes::{
    handle_get_palette, handle_import_hex, handle_import_image, handle_list_palettes,
    ImportQuery, PaletteInfo, PaletteListResponse, PaletteResponse,
};
pub use palettes::{
    __path_handle_get_palette, __path_handle_import_hex, __path_handle_import_image,
    __path_handle_list_palettes,
};
pub use process::{handle_process, ProcessQuery, __path_handle_process};
pub use progress::{handle_cancel, handle_progress, CancelResponse};
pub use progress::{__path_handle_cancel, __path_handle_progress};
pub use strategies::{handle_strategies, StrategiesResponse, StrategyInfo, __path_handle_strategies};
