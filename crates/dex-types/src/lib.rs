pub mod currency;
pub mod fuel;
pub mod intent;
pub mod order;
pub mod order_pair;
pub mod packed_data;
pub mod uint;

pub use crate::uint::*;
pub use currency::*;
pub use fuel::*;
pub use intent::*;
pub use order::*;
pub use order_pair::*;
pub use packed_data::*;
