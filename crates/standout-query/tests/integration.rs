//! End-to-end behaviour of `parse` / `parse_with`.

use serde_json::json;
use standout_query::{
    parse, parse_with, FilterRule, FilterValue, Op, Operand, OperatorMap, Options, OrderBy,
    PaginationRule, QueryError, Scalar, SearchRequest,
};

fn filters_json(query: &str) -> serde_json::Value {
    serde_json::to_value(parse(query).unwrap().filters).unwrap()
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn empty_query_yields_empty_request() {
    let request = parse("").unwrap();
    assert_eq!(request, SearchRequest::default());
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "page": null,
            "pageSize": null,
            "q": "",
            "filters": {},
            "include": [],
            "attributes": [],
            "sort": [],
        })
    );
}

// ============================================================================
// Search term
// ============================================================================

#[test]
fn search_term_is_parsed() {
    assert_eq!(parse("q=ratimbum").unwrap().q, "ratimbum");
}

#[test]
fn search_term_is_trimmed() {
    assert_eq!(parse("q=++ratimbum+").unwrap().q, "ratimbum");
}

#[test]
fn search_term_default_applies_when_absent() {
    let options = Options::new().q("castelo");
    assert_eq!(parse_with("", &options).unwrap().q, "castelo");
    assert_eq!(parse_with("q=", &options).unwrap().q, "castelo");
}

#[test]
fn repeated_search_term_uses_first_non_empty() {
    assert_eq!(parse("q=&q=hello").unwrap().q, "hello");
    assert_eq!(parse("q=a&q=b").unwrap().q, "a");

    let options = Options::new().q("castelo");
    assert_eq!(parse_with("q=&q=", &options).unwrap().q, "castelo");
}

#[test]
fn search_term_overrides_default() {
    let options = Options::new().q("castelo");
    assert_eq!(parse_with("q=ratimbum", &options).unwrap().q, "ratimbum");
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn page_default_applies_when_absent() {
    let options = Options::new().page(10);
    assert_eq!(parse_with("", &options).unwrap().page, Some(10));
    assert_eq!(parse_with("page=", &options).unwrap().page, Some(10));
}

#[test]
fn page_overrides_default() {
    let options = Options::new().page(1);
    assert_eq!(parse_with("page=2", &options).unwrap().page, Some(2));
}

#[test]
fn page_of_one_is_accepted() {
    assert_eq!(parse("page=1").unwrap().page, Some(1));
}

#[test]
fn invalid_pages_are_rejected() {
    let cases = [
        ("page=0", "page", PaginationRule::NotPositive),
        ("page=-1", "page", PaginationRule::NotPositive),
        ("page=0&page=1", "page", PaginationRule::MultipleValues),
        ("page=abc", "page", PaginationRule::NotAnInteger),
        ("page=1.5", "page", PaginationRule::NotAnInteger),
        ("page[GT]=1", "page", PaginationRule::MultipleValues),
        ("pageSize=-1", "pageSize", PaginationRule::NotPositive),
        ("pageSize=0", "pageSize", PaginationRule::NotPositive),
        ("pageSize=0&pageSize=10", "pageSize", PaginationRule::MultipleValues),
        ("pageSize=aaa", "pageSize", PaginationRule::NotAnInteger),
    ];

    for (query, field, rule) in cases {
        assert_eq!(
            parse(query),
            Err(QueryError::Pagination { field, rule }),
            "query {:?}",
            query
        );
    }
}

#[test]
fn pagination_error_message_names_field() {
    let err = parse("pageSize=0").unwrap_err();
    assert!(err.is_pagination());
    assert_eq!(err.to_string(), "pageSize must be an integer greater than 0");
}

#[test]
fn page_size_implies_first_page() {
    let request = parse("pageSize=10").unwrap();
    assert_eq!(request.page, Some(1));
    assert_eq!(request.page_size, Some(10));
}

#[test]
fn page_and_page_size_together() {
    let request = parse("page=10&pageSize=100").unwrap();
    assert_eq!(request.page, Some(10));
    assert_eq!(request.page_size, Some(100));
}

#[test]
fn default_page_size_implies_first_page() {
    let request = parse_with("", &Options::new().page_size(30)).unwrap();
    assert_eq!(request.page, Some(1));
    assert_eq!(request.page_size, Some(30));
}

#[test]
fn zero_defaults_are_ignored() {
    let request = parse_with("", &Options::new().page(0).page_size(0)).unwrap();
    assert_eq!(request.page, None);
    assert_eq!(request.page_size, None);
}

// ============================================================================
// Include / attributes
// ============================================================================

#[test]
fn list_fields_parse_single_and_repeated_values() {
    for key in ["include", "attributes"] {
        let single = parse(&format!("{key}=a")).unwrap();
        let repeated = parse(&format!("{key}=a&{key}=b")).unwrap();

        let (single, repeated) = match key {
            "include" => (single.include, repeated.include),
            _ => (single.attributes, repeated.attributes),
        };
        assert_eq!(single, vec!["a"]);
        assert_eq!(repeated, vec!["a", "b"]);
    }
}

#[test]
fn list_fields_ignore_empty_strings() {
    assert!(parse("include=").unwrap().include.is_empty());
    assert_eq!(
        parse("include=a&include=&include=b").unwrap().include,
        vec!["a", "b"]
    );
    assert!(parse("attributes=").unwrap().attributes.is_empty());
    assert_eq!(
        parse("attributes=a&attributes=&attributes=b")
            .unwrap()
            .attributes,
        vec!["a", "b"]
    );
}

#[test]
fn list_field_defaults_apply_only_when_absent() {
    let options = Options::new().include(["a"]).attributes(["x"]);

    let absent = parse_with("", &options).unwrap();
    assert_eq!(absent.include, vec!["a"]);
    assert_eq!(absent.attributes, vec!["x"]);

    let present = parse_with("include=b&attributes=y", &options).unwrap();
    assert_eq!(present.include, vec!["b"]);
    assert_eq!(present.attributes, vec!["y"]);

    let empty = parse_with("include=&attributes=", &options).unwrap();
    assert!(empty.include.is_empty());
    assert!(empty.attributes.is_empty());
}

// ============================================================================
// Sort
// ============================================================================

#[test]
fn sort_defaults_to_ascending() {
    assert_eq!(parse("sort=a").unwrap().sort, vec![OrderBy::asc("a")]);
}

#[test]
fn sort_dash_prefix_is_descending() {
    assert_eq!(parse("sort=-a").unwrap().sort, vec![OrderBy::desc("a")]);
    assert_eq!(parse("sort=--a").unwrap().sort, vec![OrderBy::desc("a")]);
}

#[test]
fn sort_keeps_input_order() {
    assert_eq!(
        parse("sort=a&sort=-b").unwrap().sort,
        vec![OrderBy::asc("a"), OrderBy::desc("b")]
    );
}

#[test]
fn sort_ignores_empty_strings() {
    assert!(parse("sort=").unwrap().sort.is_empty());
    assert_eq!(
        parse("sort=a&sort=&sort=-b").unwrap().sort,
        vec![OrderBy::asc("a"), OrderBy::desc("b")]
    );
}

#[test]
fn sort_default_applies_only_when_absent() {
    let options = Options::new().sort([OrderBy::desc("a")]);
    assert_eq!(
        parse_with("", &options).unwrap().sort,
        vec![OrderBy::desc("a")]
    );
    assert_eq!(
        parse_with("sort=b", &options).unwrap().sort,
        vec![OrderBy::asc("b")]
    );
    assert!(parse_with("sort=", &options).unwrap().sort.is_empty());
}

#[test]
fn sort_serializes_direction_names() {
    let request = parse("sort=a&sort=-b").unwrap();
    assert_eq!(
        serde_json::to_value(&request.sort).unwrap(),
        json!([
            { "field": "a", "direction": "ASC" },
            { "field": "b", "direction": "DESC" },
        ])
    );
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn reserved_keys_are_not_filters() {
    let request =
        parse("page=1&pageSize=10&q=borboleta&sort=name&attributes=name&include=x").unwrap();
    assert!(request.filters.is_empty());
}

#[test]
fn reserved_keys_are_not_filters_in_any_shape() {
    let request = parse("q=a&q=b&sort[GT]=1&include[x]=1&attributes[]=a").unwrap();
    assert!(request.filters.is_empty());
}

#[test]
fn single_filter_single_value() {
    assert_eq!(filters_json("name=maria"), json!({ "name": "maria" }));
}

#[test]
fn single_filter_multiple_values() {
    assert_eq!(
        filters_json("name=maria&name=jose"),
        json!({ "name": ["maria", "jose"] })
    );
}

#[test]
fn multiple_filters() {
    assert_eq!(
        filters_json("name=maria&name=jose&age=5"),
        json!({ "name": ["maria", "jose"], "age": "5" })
    );
}

#[test]
fn comparison_operators() {
    for op in ["GT", "GTE", "LT", "LTE", "NOT"] {
        assert_eq!(
            filters_json(&format!("age[{op}]=10")),
            json!({ "age": { op: "10" } })
        );
    }
}

#[test]
fn range_filter() {
    let request = parse("age[GTE]=10&age[LT]=20").unwrap();
    let expected = OperatorMap::new()
        .with(Op::Gte, "10")
        .and_then(|m| m.with(Op::Lt, "20"))
        .unwrap();
    assert_eq!(request.filters.get("age"), Some(&FilterValue::Ops(expected)));
}

#[test]
fn repeated_comparison_operator_is_rejected() {
    for op in [Op::Gt, Op::Gte, Op::Lt, Op::Lte] {
        let query = format!("age[{op}]=10&age[{op}]=20");
        assert_eq!(
            parse(&query),
            Err(QueryError::Filter {
                field: "age".into(),
                rule: FilterRule::MultipleValues(op),
            })
        );
    }
}

#[test]
fn multiple_negations() {
    assert_eq!(
        filters_json("age[NOT]=10&age[NOT]=12"),
        json!({ "age": { "NOT": ["10", "12"] } })
    );
}

#[test]
fn unknown_operator_is_rejected() {
    let err = parse("age[EQ]=10").unwrap_err();
    assert_eq!(
        err,
        QueryError::Filter {
            field: "age".into(),
            rule: FilterRule::UnknownOperator("EQ".into()),
        }
    );
}

#[test]
fn filter_error_aborts_whole_parse() {
    let result = parse("name=maria&page=2&age[LT]=1&age[LT]=2");
    assert!(result.unwrap_err().is_filter());
}

#[test]
fn unsupported_shapes_are_dropped() {
    let request = parse("a=1&a[GT]=2&name=maria&nested[][x]=1").unwrap();
    assert_eq!(request.filters.keys().collect::<Vec<_>>(), vec!["name"]);
}

#[test]
fn index_keys_flatten_with_plain_values() {
    assert_eq!(filters_json("x[0]=a&x=b"), json!({ "x": ["a", "b"] }));
    assert_eq!(filters_json("x=a&x[0]=b"), json!({ "x": ["a", "b"] }));
}

#[test]
fn dropped_shape_removes_default_filter() {
    let options = Options::new().filter("a", "x").filter("status", "active");

    let request = parse_with("a=1&a[GT]=2", &options).unwrap();
    assert!(!request.filters.contains_key("a"));
    assert_eq!(
        request.filters.get("status"),
        Some(&FilterValue::from("active"))
    );
}

#[test]
fn empty_filter_value_is_kept() {
    assert_eq!(filters_json("name="), json!({ "name": "" }));
}

#[test]
fn percent_encoded_brackets_are_operators() {
    assert_eq!(
        filters_json("age%5BGT%5D=10"),
        json!({ "age": { "GT": "10" } })
    );
}

#[test]
fn default_filters_are_merged_under_decoded_ones() {
    let options = Options::new()
        .filter("status", "active")
        .filter("age", OperatorMap::new().with(Op::Gte, 18i64).unwrap());

    let request = parse_with("status=archived&name=maria", &options).unwrap();
    assert_eq!(
        serde_json::to_value(&request.filters).unwrap(),
        json!({ "status": "archived", "age": { "GTE": 18 }, "name": "maria" })
    );
}

#[test]
fn default_filters_survive_empty_query() {
    let options = Options::new().filter("tags", vec![Scalar::from("a"), Scalar::from("b")]);
    let request = parse_with("", &options).unwrap();
    assert_eq!(
        request.filters.get("tags"),
        Some(&FilterValue::Many(vec!["a".into(), "b".into()]))
    );
}

#[test]
fn options_are_not_mutated_by_parse() {
    let options = Options::new().filter("status", "active").include(["a"]);
    let before = options.clone();
    parse_with("status=x&include=b&other=1", &options).unwrap();
    assert_eq!(options, before);
}

#[test]
fn numeric_filter_values_stay_strings() {
    let request = parse("age[GT]=10").unwrap();
    let ops = request.filters.get("age").and_then(FilterValue::as_ops).unwrap();
    let operand = ops.get(Op::Gt).unwrap();
    assert_eq!(operand, &Operand::One(Scalar::String("10".into())));
    assert_eq!(
        serde_json::to_value(&request.filters).unwrap(),
        json!({ "age": { "GT": "10" } })
    );
}

// ============================================================================
// Options from configuration
// ============================================================================

#[test]
fn options_from_json_drive_defaults() {
    let options = Options::from_json(
        r#"{
            "page": 2,
            "pageSize": 15,
            "q": "castelo",
            "include": ["author"],
            "attributes": ["id"],
            "sort": [{ "field": "name", "direction": "ASC" }],
            "filters": { "status": "active" }
        }"#,
    )
    .unwrap();

    let request = parse_with("", &options).unwrap();
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "page": 2,
            "pageSize": 15,
            "q": "castelo",
            "filters": { "status": "active" },
            "include": ["author"],
            "attributes": ["id"],
            "sort": [{ "field": "name", "direction": "ASC" }],
        })
    );
}
