pub mod enumerate_idx;
pub mod kruskal;
pub mod newtype_index;
pub mod time;
