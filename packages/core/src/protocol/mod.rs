// Протокольный слой
// Байтовые форматы гибридных объектов и MessagePack-конверты

pub mod wire;

pub use wire::{encode_components, pack_raw, split_components, unpack_raw};
