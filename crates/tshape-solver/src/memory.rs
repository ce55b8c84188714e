//! In-memory program host.
//!
//! `MemoryProgram` implements [`TypeQuery`] and [`ProgramHost`] over plain
//! vectors, so type graphs, files and declarations can be assembled directly
//! without a parser or checker. Recursive shapes are built by reserving an
//! object type first and defining its properties afterwards:
//!
//! ```ignore
//! let mut program = MemoryProgram::new(ProgramId(1));
//! let string = program.intrinsic("string");
//! let node = program.reserve_object();
//! program.define_properties(node, vec![
//!     PropertySpec::new("value", string),
//!     PropertySpec::new("next", node),
//! ]);
//! let file = program.add_file("src/list.ts");
//! program.declare(file, 10, DeclaredForm::ObjectShape, "ListNode", node);
//! ```

use crate::host::{
    DeclaredForm, FileId, IndexKind, ModifierFlags, NodeId, ProgramHost, ProgramId, SignatureId,
    SymbolFlags, SymbolId, TypeId, TypeQuery,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tshape_common::is_declaration_file_name;

#[derive(Clone, Debug)]
enum MemoryType {
    /// Primitive, literal or any other type rendered by its text.
    Text(String),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Object(ObjectData),
    /// Named alias; its apparent type is `target`.
    Alias { name: String, target: TypeId },
}

#[derive(Clone, Debug, Default)]
struct ObjectData {
    properties: Vec<SymbolId>,
    string_index: Option<TypeId>,
    number_index: Option<TypeId>,
    calls: Vec<SignatureId>,
    constructs: Vec<SignatureId>,
}

#[derive(Clone, Debug)]
struct MemorySymbol {
    name: Arc<str>,
    flags: SymbolFlags,
    declarations: Vec<NodeId>,
    type_id: TypeId,
}

#[derive(Clone, Debug, Default)]
struct MemoryNode {
    position: u32,
    children: Vec<NodeId>,
    form: Option<DeclaredForm>,
    symbol: Option<SymbolId>,
    type_id: Option<TypeId>,
    modifiers: ModifierFlags,
}

#[derive(Clone, Debug)]
struct MemoryFile {
    name: Arc<str>,
    root: NodeId,
    declaration_file: bool,
}

/// Description of one property for [`MemoryProgram::object`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub readonly: bool,
    /// Synthesized member with no declaring node (mapped or index-produced).
    pub synthetic: bool,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
            readonly: false,
            synthetic: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// A checked program held entirely in memory.
#[derive(Clone, Debug)]
pub struct MemoryProgram {
    id: ProgramId,
    type_info: bool,
    types: Vec<MemoryType>,
    symbols: Vec<MemorySymbol>,
    nodes: Vec<MemoryNode>,
    signatures: Vec<String>,
    files: Vec<MemoryFile>,
    /// Property types that differ when seen from a particular node.
    narrowed: FxHashMap<(SymbolId, NodeId), TypeId>,
}

impl MemoryProgram {
    /// Pre-registered type returned for nodes without a type.
    pub const UNKNOWN: TypeId = TypeId(0);

    pub fn new(id: ProgramId) -> Self {
        Self {
            id,
            type_info: true,
            types: vec![MemoryType::Text("unknown".to_string())],
            symbols: Vec::new(),
            nodes: Vec::new(),
            signatures: Vec::new(),
            files: Vec::new(),
            narrowed: FxHashMap::default(),
        }
    }

    /// Mark the program as not type-checked.
    pub fn without_type_info(mut self) -> Self {
        self.type_info = false;
        self
    }

    /// Same contents under a new program identity (a re-check).
    pub fn with_program_id(mut self, id: ProgramId) -> Self {
        self.id = id;
        self
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    fn push_type(&mut self, data: MemoryType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    /// Primitive such as `string` or `number`.
    pub fn intrinsic(&mut self, name: &str) -> TypeId {
        self.push_type(MemoryType::Text(name.to_string()))
    }

    /// String literal type, rendered with double quotes.
    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.push_type(MemoryType::Text(format!("\"{value}\"")))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.push_type(MemoryType::Text(value.to_string()))
    }

    /// Any type the checker would print as `text` (generic instantiations, enums...).
    pub fn text_type(&mut self, text: &str) -> TypeId {
        self.push_type(MemoryType::Text(text.to_string()))
    }

    /// Union in the given member order.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.push_type(MemoryType::Union(members))
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.push_type(MemoryType::Intersection(members))
    }

    /// Named alias whose apparent type is `target`.
    pub fn alias(&mut self, name: &str, target: TypeId) -> TypeId {
        self.push_type(MemoryType::Alias {
            name: name.to_string(),
            target,
        })
    }

    /// Object type with no members yet, for building recursive shapes.
    pub fn reserve_object(&mut self) -> TypeId {
        self.push_type(MemoryType::Object(ObjectData::default()))
    }

    /// Object type with `properties` in the given order.
    pub fn object(&mut self, properties: Vec<PropertySpec>) -> TypeId {
        let id = self.reserve_object();
        self.define_properties(id, properties);
        id
    }

    /// Object type with index signatures and properties.
    pub fn indexed_object(
        &mut self,
        properties: Vec<PropertySpec>,
        string_index: Option<TypeId>,
        number_index: Option<TypeId>,
    ) -> TypeId {
        let id = self.object(properties);
        if let Some(MemoryType::Object(data)) = self.types.get_mut(id.0 as usize) {
            data.string_index = string_index;
            data.number_index = number_index;
        }
        id
    }

    /// Object type with only call and construct signatures.
    pub fn callable(&mut self, calls: Vec<SignatureId>, constructs: Vec<SignatureId>) -> TypeId {
        self.push_type(MemoryType::Object(ObjectData {
            calls,
            constructs,
            ..ObjectData::default()
        }))
    }

    /// Signature rendered as `text`.
    pub fn signature(&mut self, text: &str) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        self.signatures.push(text.to_string());
        id
    }

    /// Append properties to an object type created by [`Self::reserve_object`].
    ///
    /// Has no effect on non-object types.
    pub fn define_properties(&mut self, object: TypeId, properties: Vec<PropertySpec>) {
        let mut symbols = Vec::with_capacity(properties.len());
        for spec in properties {
            let declarations = if spec.synthetic {
                Vec::new()
            } else {
                let modifiers = if spec.readonly {
                    ModifierFlags::READONLY
                } else {
                    ModifierFlags::empty()
                };
                vec![self.push_node(MemoryNode {
                    type_id: Some(spec.type_id),
                    modifiers,
                    ..MemoryNode::default()
                })]
            };
            let mut flags = SymbolFlags::PROPERTY;
            if spec.optional {
                flags |= SymbolFlags::OPTIONAL;
            }
            symbols.push(self.push_symbol(MemorySymbol {
                name: Arc::from(spec.name),
                flags,
                declarations,
                type_id: spec.type_id,
            }));
        }

        if let Some(MemoryType::Object(data)) = self.types.get_mut(object.0 as usize) {
            data.properties.extend(symbols);
        }
    }

    /// Declaring node of `object`'s property `name`; `None` for synthetic ones.
    pub fn property_node(&self, object: TypeId, name: &str) -> Option<NodeId> {
        let symbol = self.property_symbol(object, name)?;
        self.symbol(symbol)?.declarations.first().copied()
    }

    /// Make `object`'s property `name` resolve to `type_id` when seen from
    /// `location`.
    pub fn narrow_property_at(
        &mut self,
        object: TypeId,
        name: &str,
        location: NodeId,
        type_id: TypeId,
    ) {
        if let Some(symbol) = self.property_symbol(object, name) {
            self.narrowed.insert((symbol, location), type_id);
        }
    }

    fn property_symbol(&self, object: TypeId, name: &str) -> Option<SymbolId> {
        self.object_data(object)?
            .properties
            .iter()
            .copied()
            .find(|&property| self.symbol(property).is_some_and(|symbol| &*symbol.name == name))
    }

    // -------------------------------------------------------------------------
    // Files and declarations
    // -------------------------------------------------------------------------

    fn push_node(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn push_symbol(&mut self, symbol: MemorySymbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Source file; `.d.ts`-style names are treated as declaration files.
    pub fn add_file(&mut self, name: &str) -> FileId {
        let root = self.push_node(MemoryNode::default());
        let id = FileId(self.files.len() as u32);
        self.files.push(MemoryFile {
            name: Arc::from(name),
            root,
            declaration_file: is_declaration_file_name(name),
        });
        id
    }

    pub fn file_root_node(&self, file: FileId) -> NodeId {
        self.files
            .get(file.0 as usize)
            .map_or(NodeId(0), |file| file.root)
    }

    /// Plain (non-declaration) node under `parent`, e.g. a namespace body.
    pub fn add_container(&mut self, parent: NodeId, position: u32) -> NodeId {
        let node = self.push_node(MemoryNode {
            position,
            ..MemoryNode::default()
        });
        self.attach(parent, node);
        node
    }

    /// Named declaration at the top level of `file`.
    pub fn declare(
        &mut self,
        file: FileId,
        position: u32,
        form: DeclaredForm,
        name: &str,
        type_id: TypeId,
    ) -> NodeId {
        let root = self.file_root_node(file);
        self.declare_in(root, position, form, name, type_id)
    }

    /// Named declaration under `parent`.
    pub fn declare_in(
        &mut self,
        parent: NodeId,
        position: u32,
        form: DeclaredForm,
        name: &str,
        type_id: TypeId,
    ) -> NodeId {
        let node = self.push_node(MemoryNode {
            position,
            form: Some(form),
            type_id: Some(type_id),
            ..MemoryNode::default()
        });
        let symbol = self.push_symbol(MemorySymbol {
            name: Arc::from(name),
            flags: SymbolFlags::empty(),
            declarations: vec![node],
            type_id,
        });
        if let Some(entry) = self.nodes.get_mut(node.0 as usize) {
            entry.symbol = Some(symbol);
        }
        self.attach(parent, node);
        node
    }

    /// Declaration whose name does not resolve to a symbol.
    pub fn declare_unresolved(
        &mut self,
        file: FileId,
        position: u32,
        form: DeclaredForm,
        type_id: TypeId,
    ) -> NodeId {
        let root = self.file_root_node(file);
        let node = self.push_node(MemoryNode {
            position,
            form: Some(form),
            type_id: Some(type_id),
            ..MemoryNode::default()
        });
        self.attach(root, node);
        node
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(entry) = self.nodes.get_mut(parent.0 as usize) {
            entry.children.push(child);
        }
    }

    fn type_data(&self, type_id: TypeId) -> Option<&MemoryType> {
        self.types.get(type_id.0 as usize)
    }

    fn object_data(&self, type_id: TypeId) -> Option<&ObjectData> {
        match self.type_data(type_id)? {
            MemoryType::Object(data) => Some(data),
            _ => None,
        }
    }

    fn symbol(&self, symbol: SymbolId) -> Option<&MemorySymbol> {
        self.symbols.get(symbol.0 as usize)
    }

    fn node(&self, node: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(node.0 as usize)
    }

    fn render_members(&self, members: &[TypeId], separator: &str) -> String {
        members
            .iter()
            .map(|&member| self.type_to_string(member))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl TypeQuery for MemoryProgram {
    fn type_at_location(&self, node: NodeId) -> TypeId {
        self.node(node)
            .and_then(|node| node.type_id)
            .unwrap_or(Self::UNKNOWN)
    }

    fn apparent_type(&self, type_id: TypeId) -> TypeId {
        match self.type_data(type_id) {
            Some(MemoryType::Alias { target, .. }) => *target,
            _ => type_id,
        }
    }

    fn has_alias(&self, type_id: TypeId) -> bool {
        matches!(self.type_data(type_id), Some(MemoryType::Alias { .. }))
    }

    fn is_union(&self, type_id: TypeId) -> bool {
        matches!(self.type_data(type_id), Some(MemoryType::Union(_)))
    }

    fn is_intersection(&self, type_id: TypeId) -> bool {
        matches!(self.type_data(type_id), Some(MemoryType::Intersection(_)))
    }

    fn members(&self, type_id: TypeId) -> Vec<TypeId> {
        match self.type_data(type_id) {
            Some(MemoryType::Union(members) | MemoryType::Intersection(members)) => {
                members.clone()
            }
            _ => Vec::new(),
        }
    }

    fn properties(&self, type_id: TypeId) -> Vec<SymbolId> {
        self.object_data(type_id)
            .map(|data| data.properties.clone())
            .unwrap_or_default()
    }

    fn index_value_type(&self, type_id: TypeId, kind: IndexKind) -> Option<TypeId> {
        let data = self.object_data(type_id)?;
        match kind {
            IndexKind::String => data.string_index,
            IndexKind::Number => data.number_index,
        }
    }

    fn call_signatures(&self, type_id: TypeId) -> Vec<SignatureId> {
        self.object_data(type_id)
            .map(|data| data.calls.clone())
            .unwrap_or_default()
    }

    fn construct_signatures(&self, type_id: TypeId) -> Vec<SignatureId> {
        self.object_data(type_id)
            .map(|data| data.constructs.clone())
            .unwrap_or_default()
    }

    fn type_of_property_at(&self, property: SymbolId, location: NodeId) -> TypeId {
        if let Some(&narrowed) = self.narrowed.get(&(property, location)) {
            return narrowed;
        }
        self.symbol(property)
            .map_or(Self::UNKNOWN, |symbol| symbol.type_id)
    }

    fn type_to_string(&self, type_id: TypeId) -> String {
        match self.type_data(type_id) {
            Some(MemoryType::Text(text)) => text.clone(),
            Some(MemoryType::Union(members)) => self.render_members(members, " | "),
            Some(MemoryType::Intersection(members)) => self.render_members(members, " & "),
            Some(MemoryType::Alias { name, .. }) => name.clone(),
            Some(MemoryType::Object(data)) => {
                let members: Vec<String> = data
                    .properties
                    .iter()
                    .filter_map(|&property| self.symbol(property))
                    .map(|symbol| format!("{}: {}", symbol.name, self.type_to_string(symbol.type_id)))
                    .chain(data.calls.iter().map(|&sig| self.signature_to_string(sig)))
                    .collect();
                if members.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {}; }}", members.join("; "))
                }
            }
            None => "unknown".to_string(),
        }
    }

    fn signature_to_string(&self, signature: SignatureId) -> String {
        self.signatures
            .get(signature.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Arc<str> {
        self.symbol(symbol)
            .map_or_else(|| Arc::from(""), |symbol| Arc::clone(&symbol.name))
    }

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags {
        self.symbol(symbol)
            .map(|symbol| symbol.flags)
            .unwrap_or_default()
    }

    fn symbol_declarations(&self, symbol: SymbolId) -> Vec<NodeId> {
        self.symbol(symbol)
            .map(|symbol| symbol.declarations.clone())
            .unwrap_or_default()
    }

    fn modifier_flags(&self, node: NodeId) -> ModifierFlags {
        self.node(node).map(|node| node.modifiers).unwrap_or_default()
    }
}

impl ProgramHost for MemoryProgram {
    fn as_type_query(&self) -> &dyn TypeQuery {
        self
    }

    fn program_id(&self) -> ProgramId {
        self.id
    }

    fn has_type_info(&self) -> bool {
        self.type_info
    }

    fn source_files(&self) -> Vec<FileId> {
        (0..self.files.len() as u32).map(FileId).collect()
    }

    fn file_name(&self, file: FileId) -> Arc<str> {
        self.files
            .get(file.0 as usize)
            .map_or_else(|| Arc::from(""), |file| Arc::clone(&file.name))
    }

    fn is_declaration_file(&self, file: FileId) -> bool {
        self.files
            .get(file.0 as usize)
            .is_some_and(|file| file.declaration_file)
    }

    fn file_root(&self, file: FileId) -> NodeId {
        self.file_root_node(file)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn declaration_form(&self, node: NodeId) -> Option<DeclaredForm> {
        self.node(node)?.form
    }

    fn declaration_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.node(node)?.symbol
    }

    fn node_position(&self, node: NodeId) -> u32 {
        self.node(node).map_or(0, |node| node.position)
    }
}
