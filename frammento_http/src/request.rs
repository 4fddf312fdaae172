// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt;

use crate::{
    HeaderMap,
    Method,
    QueryMap,
};

/// A fully received request, as handed out by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub queries: QueryMap,
    pub version: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "> Request Method: {}", self.method)?;
        writeln!(f, "> Request Path:   {}", self.path)?;
        writeln!(f, "> Queries:")?;
        for (key, value) in self.queries.iter() {
            writeln!(f, "> {key}: {value}")?;
        }
        writeln!(f)?;
        writeln!(f, "> HTTP Version:   {}", self.version)?;
        writeln!(f)?;
        writeln!(f, "> HEADERS:")?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "> {name}: {value}")?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "> Request Body:")?;
        writeln!(f, "{}", self.body)
    }
}
