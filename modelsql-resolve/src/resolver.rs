//! The placeholder resolution state machine.

use modelsql_schema::{SchemaRegistry, TableSchema};

use crate::error::{ResolveError, ResolveResult};

#[derive(Clone, Copy, PartialEq)]
enum State {
    Outside,
    InModel,
    InField,
}

/// Rewrites symbolic SQL templates into literal SQL against a schema
/// registry.
///
/// Three placeholder forms are recognized:
/// - `{Model}` → the model's table name
/// - `{Model:Field1, Field2}` → `column1, column2`
/// - `{Model.Field1, Field2}` → `table.column1, table.column2`
///
/// Spaces after a comma inside a field list are preserved verbatim.
/// Resolution is all-or-nothing: an unknown model or field aborts the scan
/// and no partial output is returned. This runs once per template at
/// generation time; its output feeds the statement cache's builders.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderResolver<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> PlaceholderResolver<'r> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        PlaceholderResolver { registry }
    }

    /// Resolves every placeholder in `template` to literal SQL.
    pub fn resolve(&self, template: &str) -> ResolveResult<String> {
        let mut state = State::Outside;
        let mut out = String::with_capacity(template.len());
        let mut model = String::new();
        let mut field = String::new();
        // Set while scanning a field list; `.` qualifies columns with the
        // table name, `:` does not.
        let mut qualified = false;
        let mut table: Option<&TableSchema> = None;

        for c in template.chars() {
            match state {
                State::Outside => {
                    if c == '{' {
                        state = State::InModel;
                        qualified = false;
                        model.clear();
                        field.clear();
                    } else {
                        out.push(c);
                    }
                }

                State::InModel => match c {
                    '}' => {
                        out.push_str(self.table_of(&model)?.table.as_str());
                        state = State::Outside;
                    }
                    '.' | ':' => {
                        qualified = c == '.';
                        table = Some(self.table_of(&model)?);
                        state = State::InField;
                    }
                    _ => model.push(c),
                },

                State::InField => match c {
                    ',' | '}' => {
                        // `table` was set on the transition into InField.
                        let table = table.unwrap_or_else(|| unreachable!());
                        write_column(&mut out, table, qualified, &model, &field)?;
                        field.clear();
                        if c == '}' {
                            state = State::Outside;
                        } else {
                            out.push(',');
                        }
                    }
                    ' ' => out.push(' '),
                    _ => field.push(c),
                },
            }
        }

        Ok(out)
    }

    fn table_of(&self, model: &str) -> ResolveResult<&'r TableSchema> {
        self.registry
            .schema_of(model)
            .ok_or_else(|| ResolveError::UnknownModel {
                model: model.to_owned(),
            })
    }
}

fn write_column(
    out: &mut String,
    table: &TableSchema,
    qualified: bool,
    model: &str,
    field: &str,
) -> ResolveResult<()> {
    let column = table
        .column_of(field)
        .ok_or_else(|| ResolveError::UnknownField {
            model: model.to_owned(),
            field: field.to_owned(),
        })?;

    if qualified {
        out.push_str(&table.table);
        out.push('.');
    }
    out.push_str(column);
    Ok(())
}

/// One-shot convenience wrapper over [`PlaceholderResolver::resolve`].
pub fn resolve(registry: &SchemaRegistry, template: &str) -> ResolveResult<String> {
    PlaceholderResolver::new(registry).resolve(template)
}
