use std::sync::atomic::{AtomicUsize, Ordering};

use viewdef::catalog::StaticCatalog;
use viewdef::errors::{CatalogError, ViewDefinitionError};
use viewdef::models::enums::{DatabaseType, JoinType};
use viewdef::models::structs::Condition;
use viewdef::syntax::{NodeKind, SqlParserFrontend, SyntaxNode, SyntaxParser};
use viewdef::{convert_view, read_view};

const ORDERS_VIEW: &str = "select `o`.`id` AS `id`,`c`.`name` AS `customer`,`o`.`total` AS `total` \
     from (`shop`.`orders` `o` left join `shop`.`customers` `c` on((`c`.`id` = `o`.`customer_id`))) \
     where ((`o`.`total` > 100) and ((`c`.`vip` = 1) or (`c`.`age` > 60)))";

struct CountingParser {
    inner: SqlParserFrontend,
    calls: AtomicUsize,
}

impl SyntaxParser for CountingParser {
    fn parse(&self, sql: &str) -> Result<SyntaxNode, ViewDefinitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(sql)
    }
}

fn counting(database_type: DatabaseType) -> CountingParser {
    CountingParser { inner: SqlParserFrontend::new(database_type), calls: AtomicUsize::new(0) }
}

#[tokio::test]
async fn reads_mysql_view_from_catalog() {
    let catalog = StaticCatalog::new(DatabaseType::MySQL).with_view("shop", "view_orders", ORDERS_VIEW);
    let parser = SqlParserFrontend::new(DatabaseType::MySQL);

    let view = read_view(&catalog, &parser, "shop", "view_orders").await.unwrap();
    assert_eq!(view.name, "view_orders");
    assert_eq!(view.definition, ORDERS_VIEW);

    let query = &view.query;
    let aliases: Vec<_> = query.select.iter().map(|c| c.alias.as_str()).collect();
    assert_eq!(aliases, vec!["`id`", "`customer`", "`total`"]);

    let from = query.from.as_ref().unwrap();
    assert_eq!(from.source, "`shop`.`orders`");
    assert_eq!(from.alias, "`o`");

    assert_eq!(query.joins.len(), 1);
    let join = &query.joins[0];
    assert_eq!(join.join_type, JoinType::LeftJoin);
    assert_eq!(join.source, "`shop`.`customers`");
    assert_eq!(join.alias, "`c`");
    assert_eq!(join.condition, "`c`.`id` = `o`.`customer_id`");

    let condition = query.where_condition.as_ref().unwrap();
    assert_eq!(condition.operand_count(), 2);
    assert_eq!(condition.depth(), 2);
    assert_eq!(
        *condition,
        Condition::expression("`o`.`total` > 100")
            .and(Condition::expression("`c`.`vip` = 1").or("`c`.`age` > 60"))
    );
}

#[tokio::test]
async fn catalog_failure_is_reported_before_parsing() {
    let catalog = StaticCatalog::new(DatabaseType::MySQL);
    let parser = counting(DatabaseType::MySQL);

    let err = read_view(&catalog, &parser, "shop", "missing").await.unwrap_err();
    assert!(matches!(
        err,
        ViewDefinitionError::Retrieval(CatalogError::NotFound { ref view, .. }) if view == "missing"
    ));
    assert_eq!(parser.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn parse_failure_surfaces_as_parse_error() {
    let catalog = StaticCatalog::new(DatabaseType::PostgreSQL).with_view("public", "broken", "SELECT * FROM t WHERE");
    let parser = counting(DatabaseType::PostgreSQL);

    let err = read_view(&catalog, &parser, "public", "broken").await.unwrap_err();
    assert!(matches!(err, ViewDefinitionError::Parse(_)));
    assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn union_view_is_an_unexpected_root() {
    let parser = SqlParserFrontend::new(DatabaseType::PostgreSQL);
    let err = convert_view("v", "SELECT a FROM t UNION SELECT a FROM u", &parser).unwrap_err();
    assert!(matches!(err, ViewDefinitionError::UnexpectedRoot { found: NodeKind::Union }));
}

#[test]
fn comma_separated_tables_become_plain_joins() {
    let parser = SqlParserFrontend::new(DatabaseType::SQLite);
    let view = convert_view("v", "SELECT a.x, b.y FROM a, b WHERE a.id = b.id", &parser).unwrap();
    let join = &view.query.joins[0];
    assert_eq!(join.join_type, JoinType::Join);
    assert_eq!(join.source, "b");
    assert_eq!(join.condition, "");
    assert_eq!(view.query.where_condition, Some(Condition::expression("a.id = b.id")));
}

#[test]
fn emitted_sql_reconstructs_the_same_model() {
    let parser = SqlParserFrontend::new(DatabaseType::PostgreSQL);
    let sql = "SELECT DISTINCT o.id, c.name AS customer FROM orders o \
               LEFT JOIN customers c ON c.id = o.customer_id \
               RIGHT JOIN regions r ON r.id = c.region_id \
               WHERE o.total > 100 AND (c.vip = 1 OR c.age > 60) OR o.rush = 1 \
               GROUP BY o.id, c.name HAVING count(*) > 1 ORDER BY o.id DESC LIMIT 10 OFFSET 5";

    let first = convert_view("v", sql, &parser).unwrap();
    let emitted = first.query.to_string();
    let second = convert_view("v", &emitted, &parser).unwrap();
    assert_eq!(first.query, second.query);

    let condition = first.query.where_condition.unwrap();
    assert_eq!(condition.operand_count(), 3);
    assert_eq!(condition.to_string(), "o.total > 100 AND (c.vip = 1 OR c.age > 60) OR o.rush = 1");
}

#[test]
fn create_view_text_is_accepted() {
    let parser = SqlParserFrontend::new(DatabaseType::SQLite);
    let view = convert_view("active_users", "CREATE VIEW active_users AS SELECT id, name FROM users WHERE active = 1", &parser)
        .unwrap();
    assert_eq!(view.query.select.len(), 2);
    assert_eq!(view.create_sql(), "CREATE VIEW active_users AS SELECT id, name FROM users WHERE active = 1");
}

#[test]
fn serializes_where_under_its_sql_name() {
    let parser = SqlParserFrontend::new(DatabaseType::SQLite);
    let view = convert_view("v", "SELECT id FROM t WHERE a = 1", &parser).unwrap();
    let json = serde_json::to_value(&view.query).unwrap();
    assert!(json.get("where").is_some());
    assert!(json.get("where_condition").is_none());
}

#[test]
fn grouped_join_condition_keeps_its_parentheses() {
    let parser = SqlParserFrontend::new(DatabaseType::PostgreSQL);
    let view = convert_view("v", "SELECT a.id FROM a JOIN b ON a.x = 1 AND (b.y = 2 OR b.z = 3)", &parser).unwrap();
    assert_eq!(view.query.joins[0].condition, "a.x = 1 AND (b.y = 2 OR b.z = 3)");

    let emitted = view.query.to_string();
    assert_eq!(emitted, "SELECT a.id FROM a JOIN b ON a.x = 1 AND (b.y = 2 OR b.z = 3)");
    let reparsed = convert_view("v", &emitted, &parser).unwrap();
    assert_eq!(reparsed.query, view.query);
}

#[test]
fn mysql_grouped_join_condition_keeps_its_parentheses() {
    let parser = SqlParserFrontend::new(DatabaseType::MySQL);
    let sql = "select `a`.`id` AS `id` from (`a` join `b` on((((`a`.`x` = 1) or (`b`.`y` = 2)) and (`b`.`z` = 3))))";
    let view = convert_view("v", sql, &parser).unwrap();
    assert_eq!(view.query.joins[0].condition, "(`a`.`x` = 1 OR `b`.`y` = 2) AND `b`.`z` = 3");
}

#[test]
fn join_condition_without_operator_is_a_parse_error() {
    let parser = SqlParserFrontend::new(DatabaseType::PostgreSQL);
    let err = convert_view("v", "SELECT a.id FROM a JOIN b ON b.deleted_at IS NULL", &parser).unwrap_err();
    assert!(matches!(err, ViewDefinitionError::Parse(_)));
}
