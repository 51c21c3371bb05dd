//! Binary persistence of operation settings and page-set nodes.

mod codec;
mod stream;

pub use codec::{
    decode_list_settings, decode_search_settings, encode_list_settings, encode_search_settings,
    read_node, read_search_settings, write_node, write_search_settings, NodeCodec,
    FORMAT_VERSION, NODE_REGISTRY,
};
pub use stream::{StreamReader, StreamWriter};
