//! Versioned binary encoding of operation settings and page-set nodes.

use crate::error::{Result, SearchError};
use crate::operation::SearchSettings;
use crate::query::{AllPagesNode, DepthLimit, SearchNode, SubtreePagesNode};
use crate::types::{PageOrdering, WildcardMode};

use super::stream::{StreamReader, StreamWriter};

/// Current version tag of every persisted record.
pub const FORMAT_VERSION: u32 = 0;

/// Encoder and decoder for one persistable node class.
pub struct NodeCodec {
    pub tag: &'static str,
    /// Writes the node body; `None` when the node is of another class.
    pub encode: fn(&SearchNode, &mut StreamWriter) -> Option<Result<()>>,
    pub decode: fn(&mut StreamReader<'_>) -> Result<SearchNode>,
}

/// Every persistable node class. New persistable nodes are added here only.
pub static NODE_REGISTRY: &[NodeCodec] = &[
    NodeCodec {
        tag: AllPagesNode::CLASS_TAG,
        encode: encode_all_pages,
        decode: decode_all_pages,
    },
    NodeCodec {
        tag: SubtreePagesNode::CLASS_TAG,
        encode: encode_subtree_pages,
        decode: decode_subtree_pages,
    },
];

fn lookup_codec(tag: &str) -> Option<&'static NodeCodec> {
    NODE_REGISTRY.iter().find(|codec| codec.tag == tag)
}

// ---------------------------------------------------------------------------
// Version tags
// ---------------------------------------------------------------------------

fn write_version(writer: &mut StreamWriter) {
    writer.write_u32(FORMAT_VERSION);
}

fn read_version(reader: &mut StreamReader<'_>, what: &'static str) -> Result<()> {
    let version = reader.read_u32()?;
    if version != FORMAT_VERSION {
        return Err(SearchError::UnsupportedVersion { what, version });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Search/replace settings
// ---------------------------------------------------------------------------

/// Writes the persisted part of `settings`.
///
/// Title, ordering and the corpus-wide flag are not part of the record.
pub fn write_search_settings(writer: &mut StreamWriter, settings: &SearchSettings) -> Result<()> {
    write_version(writer);
    writer.write_str(&settings.search)?;
    writer.write_str(&settings.replace)?;
    writer.write_bool(settings.replace_op);
    writer.write_bool(settings.whole_word);
    writer.write_bool(settings.case_sensitive);
    writer.write_bool(settings.wrap_around);
    writer.write_bool(settings.boolean_query);
    writer.write_str(settings.wildcard.as_str())?;
    Ok(())
}

/// Reads a record written by [`write_search_settings`] over `settings`.
///
/// `settings` is left untouched when decoding fails.
pub fn read_search_settings(
    reader: &mut StreamReader<'_>,
    settings: &mut SearchSettings,
) -> Result<()> {
    read_version(reader, "search settings")?;
    let search = reader.read_string()?;
    let replace = reader.read_string()?;
    let replace_op = reader.read_bool()?;
    let whole_word = reader.read_bool()?;
    let case_sensitive = reader.read_bool()?;
    let wrap_around = reader.read_bool()?;
    let boolean_query = reader.read_bool()?;
    let wildcard = WildcardMode::parse(&reader.read_string()?)?;

    settings.search = search;
    settings.replace = replace;
    settings.replace_op = replace_op;
    settings.whole_word = whole_word;
    settings.case_sensitive = case_sensitive;
    settings.wrap_around = wrap_around;
    settings.boolean_query = boolean_query;
    settings.wildcard = wildcard;
    Ok(())
}

pub fn encode_search_settings(settings: &SearchSettings) -> Result<Vec<u8>> {
    let mut writer = StreamWriter::new();
    write_search_settings(&mut writer, settings)?;
    Ok(writer.into_bytes())
}

/// Decodes packed settings, keeping the unpersisted fields of `base`.
pub fn decode_search_settings(data: &[u8], base: &SearchSettings) -> Result<SearchSettings> {
    let mut settings = base.clone();
    let mut reader = StreamReader::new(data);
    read_search_settings(&mut reader, &mut settings)?;
    reader.finish()?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// List-pages settings
// ---------------------------------------------------------------------------

pub fn encode_list_settings(ordering: PageOrdering, tree: &SearchNode) -> Result<Vec<u8>> {
    let mut writer = StreamWriter::new();
    write_version(&mut writer);
    writer.write_str(ordering.as_str())?;
    write_node(&mut writer, tree)?;
    Ok(writer.into_bytes())
}

pub fn decode_list_settings(data: &[u8]) -> Result<(PageOrdering, SearchNode)> {
    let mut reader = StreamReader::new(data);
    read_version(&mut reader, "list settings")?;
    let ordering = PageOrdering::parse(&reader.read_string()?)?;
    let tree = read_node(&mut reader)?;
    reader.finish()?;
    Ok((ordering, tree))
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Writes the class tag and body of a persistable node.
pub fn write_node(writer: &mut StreamWriter, node: &SearchNode) -> Result<()> {
    for codec in NODE_REGISTRY {
        let mut body = StreamWriter::new();
        if let Some(result) = (codec.encode)(node, &mut body) {
            result?;
            writer.write_str(codec.tag)?;
            writer.append(body);
            return Ok(());
        }
    }
    Err(SearchError::NotPersistable(node.kind()))
}

/// Reads a node written by [`write_node`], dispatching on its class tag.
pub fn read_node(reader: &mut StreamReader<'_>) -> Result<SearchNode> {
    let tag = reader.read_string()?;
    let codec = lookup_codec(&tag).ok_or(SearchError::UnknownNodeClass(tag))?;
    (codec.decode)(reader)
}

fn encode_all_pages(node: &SearchNode, writer: &mut StreamWriter) -> Option<Result<()>> {
    let SearchNode::AllPages(_) = node else {
        return None;
    };
    write_version(writer);
    Some(Ok(()))
}

fn decode_all_pages(reader: &mut StreamReader<'_>) -> Result<SearchNode> {
    read_version(reader, AllPagesNode::CLASS_TAG)?;
    Ok(AllPagesNode.into())
}

fn encode_subtree_pages(node: &SearchNode, writer: &mut StreamWriter) -> Option<Result<()>> {
    let SearchNode::SubtreePages(node) = node else {
        return None;
    };
    Some(write_subtree_body(node, writer))
}

fn write_subtree_body(node: &SubtreePagesNode, writer: &mut StreamWriter) -> Result<()> {
    write_version(writer);
    writer.write_str(node.root())?;
    writer.write_i32(node.depth().to_wire()?);
    Ok(())
}

fn decode_subtree_pages(reader: &mut StreamReader<'_>) -> Result<SearchNode> {
    read_version(reader, SubtreePagesNode::CLASS_TAG)?;
    let root = reader.read_string()?;
    let depth = DepthLimit::from_wire(reader.read_i32()?)?;
    Ok(SubtreePagesNode::new(root, depth).into())
}
