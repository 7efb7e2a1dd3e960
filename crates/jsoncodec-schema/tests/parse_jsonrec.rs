use jsoncodec_schema::{parse_file, Primitive, Shape};

#[test]
fn multi_record_file_preserves_declaration_order() {
    let src = r#"
        record Order {
            id: int64,
            customer: Customer,
            items: [string],
        }

        record Customer {
            name: string,
            email: string @key("email_address"),
        }
    "#;
    let file = parse_file("orders.jsonrec", src).unwrap();
    let names: Vec<&str> = file.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "Customer"]);

    let order = &file.records[0];
    assert_eq!(order.fields[0].declared_name, "id");
    assert_eq!(order.fields[0].shape, Shape::Primitive(Primitive::Int64));
    assert_eq!(order.fields[1].shape, Shape::Nested("Customer".to_string()));
    assert_eq!(
        order.fields[2].shape,
        Shape::Array(Box::new(Shape::Primitive(Primitive::String)))
    );

    let customer = &file.records[1];
    assert_eq!(customer.fields[1].wire_key, "email_address");
}

#[test]
fn empty_record_is_allowed() {
    let file = parse_file("empty.jsonrec", "record Empty {}").unwrap();
    assert_eq!(file.records[0].fields.len(), 0);
}

#[test]
fn nested_arrays_are_supported_shapes() {
    let file = parse_file("a.jsonrec", "record A { grid: [[int32]] }").unwrap();
    assert_eq!(
        file.records[0].fields[0].shape,
        Shape::Array(Box::new(Shape::Array(Box::new(Shape::Primitive(
            Primitive::Int32
        )))))
    );
}

#[test]
fn malformed_file_reports_path_and_line() {
    let src = "record A {\n    x string,\n}\n";
    let err = parse_file("bad.jsonrec", src).unwrap_err();
    assert_eq!(err.path, "bad.jsonrec");
    assert_eq!(err.line, 2);
}
