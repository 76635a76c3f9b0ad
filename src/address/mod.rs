pub mod label_parser;
pub mod markup;
