//! A lightweight C# frontend over tree-sitter.
//!
//! This is the layer the navigation engine binds against:
//!
//! - [`SyntaxTree`]: a parsed document with its text and line table
//! - [`Compilation`]: one project's trees and their shared declaration table
//! - [`SemanticModel`]: declared symbols, resolved references and types for one tree
//! - [`Symbol`] and [`symbols_match`]: opaque handles and their equivalence
//!
//! It is not a type checker. It resolves names the way navigation needs
//! them and gives up quietly (no symbol) where that would take real type
//! inference.

mod binder;
mod compilation;
mod declarations;
mod scope;
mod symbols;
pub(crate) mod syntax;

pub use binder::{Resolution, SemanticModel, is_declaration_name, is_type_position};
pub use compilation::Compilation;
pub use symbols::{DeclSite, Symbol, SymbolData, SymbolId, SymbolKey, SymbolTable, TypeRef, symbols_match};
pub use syntax::SyntaxTree;

pub(crate) use declarations::{declarator_name, return_type_node};
