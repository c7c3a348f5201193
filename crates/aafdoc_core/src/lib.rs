//! Public library API for decoding AAF property data and reading OPAtom MXF files.

/// Type codec, MXF KLV reader, object graph, and link layer.
pub mod aaf;
