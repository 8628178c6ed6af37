//! The classes command - list the configured model classes.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Print the class registry.
pub fn execute_classes(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.classes.is_empty() {
        println!(
            "{}",
            formatter.warning("No classes configured. Add a [classes] table to the config.")
        );
        return Ok(());
    }

    let mut names: Vec<&String> = config.classes.keys().collect();
    names.sort();

    let mut builder = Builder::default();
    builder.push_record(["Class", "Required Fields"]);
    for name in names {
        let fields = config.classes[name].required_fields.join(", ");
        builder.push_record([name.as_str(), &fields]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("{}", table);
    Ok(())
}
