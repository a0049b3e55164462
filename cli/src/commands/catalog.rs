use crate::argparse::OperatorsArgs;
use filterkit_common::{FieldCatalog, OperatorRegistry};
use tabular::{Row, Table};

pub fn handle_operators_command(
    args: OperatorsArgs,
    operators: &OperatorRegistry,
) -> anyhow::Result<()> {
    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}  {:<}").with_row(Row::from_cells(
        ["Operator", "Value", "Description"].iter().cloned(),
    ));

    for op in operators.operators_for(args.field_type) {
        table.add_row(
            Row::new()
                .with_cell(&op.key)
                .with_cell(op.value_type)
                .with_cell(op.words()),
        );
    }
    print!("{}", table);
    Ok(())
}

pub fn handle_fields_command(catalog: &FieldCatalog) -> anyhow::Result<()> {
    #[allow(clippy::literal_string_with_formatting_args)]
    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}").with_row(Row::from_cells(
        ["Key", "Label", "Type", "Entity"].iter().cloned(),
    ));

    for field in catalog.iter() {
        table.add_row(
            Row::new()
                .with_cell(&field.key)
                .with_cell(&field.label)
                .with_cell(field.field_type)
                .with_cell(field.entity.as_deref().unwrap_or("-")),
        );
    }
    print!("{}", table);
    Ok(())
}
