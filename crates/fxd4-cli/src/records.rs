use fxd4_client::RemoteClient;
use fxd4_model::{Model, Record, ID_COLUMN};
use tracing::debug;

use crate::{
    cli::QueryArgs,
    error::CliResult,
    utils::{parse_assignment, parse_order, parse_payload, parse_value},
};

/// Rows fetched by `fxd4 query`. With `--first` this is zero or one row.
pub fn query_records(client: &RemoteClient, args: &QueryArgs) -> CliResult<Vec<Record>> {
    let mut query = Model::new(client.clone(), &args.table).query();

    for filter in &args.filters {
        let (column, value) = parse_assignment(filter)?;
        query = query.where_eq(column, parse_value(&value));
    }

    for filter in &args.in_filters {
        let (column, values) = parse_assignment(filter)?;
        query = query.where_in(column, values.split(',').map(parse_value));
    }

    for expression in &args.or_filters {
        query = query.where_or(expression.as_str());
    }

    for order in &args.order {
        let (column, options) = parse_order(order, args.nulls_first)?;
        query = query.order_by(column, options);
    }

    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    debug!(
        "querying '{}' with {} filter(s)",
        args.table,
        query.state().filters().len()
    );

    if args.first {
        Ok(query.first()?.into_iter().collect())
    } else {
        Ok(query.get()?)
    }
}

/// The row whose `column` (default `id`) equals `value`.
pub fn find_record(
    client: &RemoteClient,
    table: &str,
    value: &str,
    column: Option<&str>,
) -> CliResult<Option<Record>> {
    let model = Model::new(client.clone(), table);
    let value = parse_value(value);

    let record = match column {
        Some(column) if column != ID_COLUMN => model.find_by(column, value)?,
        _ => model.find(value)?,
    };
    Ok(record)
}

pub fn create_record(client: &RemoteClient, table: &str, payload: &str) -> CliResult<Record> {
    let payload = parse_payload(payload)?;
    Ok(Model::new(client.clone(), table).create(&payload)?)
}

pub fn update_record(
    client: &RemoteClient,
    table: &str,
    id: &str,
    payload: &str,
) -> CliResult<Record> {
    let payload = parse_payload(payload)?;
    Ok(Model::new(client.clone(), table).update(parse_value(id), &payload)?)
}

pub fn delete_record(client: &RemoteClient, table: &str, id: &str) -> CliResult<bool> {
    Ok(Model::new(client.clone(), table).delete(parse_value(id))?)
}
