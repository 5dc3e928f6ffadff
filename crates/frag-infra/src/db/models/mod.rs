pub mod fragment_row;

pub use fragment_row::FragmentRow;
