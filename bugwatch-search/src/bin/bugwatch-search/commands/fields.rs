use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use bugwatch_search::{FieldConfig, FieldSchema, SORTABLE_FIELDS};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Field Reference",
    commands: &[
        "bugwatch-search fields",
        "bugwatch-search --output json fields   # schema for editor integrations",
    ],
}];

#[derive(Serialize)]
struct FieldList {
    fields: Vec<FieldConfig>,
    sortable: &'static [&'static str],
}

impl TableDisplay for FieldList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Field", "Type", "Operators", "Values", "Aliases", "Description"]);
        for field in &self.fields {
            let operators: Vec<String> = field
                .operators
                .iter()
                .map(|op| match op.symbol() {
                    "" => ":".to_string(),
                    symbol => format!(":{symbol}"),
                })
                .collect();
            table.add_row(vec![
                Cell::new(field.name),
                Cell::new(field.field_type.as_str()),
                Cell::new(operators.join(" ")),
                Cell::new(field.values.join(", ")),
                Cell::new(field.aliases.join(", ")),
                Cell::new(field.description),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.fields.iter().map(|f| f.name).collect::<Vec<_>>().join(" ")
    }
}

pub fn handle_fields(output: &OutputManager) -> Result<()> {
    let list = FieldList {
        fields: FieldSchema::global().fields().copied().collect(),
        sortable: SORTABLE_FIELDS,
    };
    output.display(&list)?;

    if output.is_table() {
        output.heading("Sorting");
        output.bullet(&format!("sort:<field>[:asc] with field one of {}", SORTABLE_FIELDS.join(", ")));
        output.bullet("Prefix any filter with '-' to negate it (validated, not yet applied)");
    }
    Ok(())
}
