use serde_json::{Map, Value};

use crate::domain::{Query, QueryAction};

pub fn encode_query_json(request: &Query) -> Map<String, Value> {
    let mut body = request
        .params()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<Map<String, Value>>();
    body.insert(
        QueryAction::FIELD.to_owned(),
        Value::from(request.action().as_str()),
    );
    body
}
