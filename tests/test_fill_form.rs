//! Integration tests for filling form fields in an in-memory document.
//!
//! Each test builds a small AcroForm, fills it, and inspects the objects the fill wrote.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_form_fill::config::{FillOptions, DEFAULT_MAX_DEPTH};
use pdf_form_fill::document::{Document, ObjectReader};
use pdf_form_fill::error::Error;
use pdf_form_fill::form::{fill_form, list_fields, FillOutcome};
use pdf_form_fill::layout::{TextExtent, TextLayout};
use pdf_form_fill::object::{Dictionary, Object, ObjectRef};
use pdf_form_fill::value::{FieldValues, Value};
use std::io::Write;
use std::sync::Arc;

fn dict(entries: Vec<(&str, Object)>) -> Dictionary {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn text(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec())
}

fn rect(w: i64, h: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(w),
        Object::Integer(h),
    ])
}

fn values(entries: Vec<(&str, Value)>) -> FieldValues {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Builds a document with a catalog and an indirect AcroForm.
struct FormBuilder {
    doc: Document,
}

impl FormBuilder {
    fn new() -> Self {
        Self {
            doc: Document::new(),
        }
    }

    fn add(&mut self, obj: impl Into<Object>) -> ObjectRef {
        self.doc.add_object(obj)
    }

    fn stream(&mut self, content: &[u8]) -> ObjectRef {
        self.add(Object::Stream {
            dict: dict(vec![("Subtype", Object::name("Form"))]),
            data: bytes::Bytes::copy_from_slice(content),
        })
    }

    fn finish(self, fields: Vec<ObjectRef>, form_entries: Vec<(&str, Object)>) -> (Document, ObjectRef) {
        let mut doc = self.doc;
        let mut form = dict(vec![(
            "Fields",
            Object::Array(fields.into_iter().map(Object::Reference).collect()),
        )]);
        form.extend(form_entries.into_iter().map(|(k, v)| (k.to_string(), v)));
        let form_id = doc.add_object(form);
        let catalog = doc.add_object(dict(vec![
            ("Type", Object::name("Catalog")),
            ("AcroForm", Object::Reference(form_id)),
        ]));
        doc.set_root(catalog);
        (doc, form_id)
    }
}

fn written_dict(outcome: &FillOutcome, id: ObjectRef) -> &Dictionary {
    outcome
        .objects
        .get(&id)
        .and_then(Object::as_dict)
        .unwrap_or_else(|| panic!("object {} not written as a dictionary", id))
}

/// The appearance stream a written field's `/AP /N` points at.
fn appearance(outcome: &FillOutcome, field: &Dictionary) -> (Dictionary, String) {
    let ap = field["AP"].as_dict().expect("AP dictionary");
    let form_id = ap["N"].as_reference().expect("N reference");
    match &outcome.objects[&form_id] {
        Object::Stream { dict, data } => (dict.clone(), String::from_utf8_lossy(data).into_owned()),
        other => panic!("Expected appearance stream, got {:?}", other),
    }
}

fn text_widget(name: &str, extra: Vec<(&str, Object)>) -> Dictionary {
    let mut d = dict(vec![
        ("FT", Object::name("Tx")),
        ("T", text(name)),
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(100, 20)),
    ]);
    d.extend(extra.into_iter().map(|(k, v)| (k.to_string(), v)));
    d
}

#[derive(Debug)]
struct FixedLayout;

impl TextLayout for FixedLayout {
    fn font_size(&self) -> f64 {
        10.0
    }

    fn measure(&self, _text: &str, _font_size: f64) -> TextExtent {
        TextExtent {
            width: 40.0,
            height: 10.0,
        }
    }

    fn font_resource_name(&self) -> &str {
        "F0"
    }

    fn font_dictionary(&self) -> Dictionary {
        dict(vec![("BaseFont", Object::name("Helvetica"))])
    }
}

#[test]
fn test_root_text_field_filled() {
    let mut b = FormBuilder::new();
    let city = b.add(text_widget("City", vec![("DA", text("/Helv 0 Tf 0 g"))]));
    let (doc, form_id) = b.finish(vec![city], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("City", Value::from("Paris"))]),
        &FillOptions::default(),
    )
    .unwrap();

    assert!(outcome.matched.contains("City"));
    assert!(outcome.objects.contains_key(&form_id));

    let field = written_dict(&outcome, city);
    assert_eq!(field["V"], text("Paris"));
    let (xobject, content) = appearance(&outcome, field);
    assert_eq!(xobject["Subtype"], Object::name("Form"));
    assert_eq!(xobject["BBox"], rect(100, 20));
    assert_eq!(
        content,
        "/Tx BMC\nq\nBT\n/Helv 0 Tf 0 g\n(Paris) Tj\nET\nQ\nEMC"
    );
}

#[test]
fn test_nested_field_uses_qualified_name_and_inherited_type() {
    let mut b = FormBuilder::new();
    let line1 = b.add(dict(vec![
        ("T", text("Line1")),
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(100, 20)),
    ]));
    let address = b.add(dict(vec![
        ("T", text("Address")),
        ("FT", Object::name("Tx")),
        ("Kids", Object::Array(vec![Object::Reference(line1)])),
    ]));
    let (doc, _) = b.finish(vec![address], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![
            ("Address.Line1", Value::from("1 Main St")),
            ("Line1", Value::from("wrong")),
        ]),
        &FillOptions::default(),
    )
    .unwrap();

    assert!(outcome.matched.contains("Address.Line1"));
    assert!(!outcome.matched.contains("Line1"));
    assert_eq!(written_dict(&outcome, line1)["V"], text("1 Main St"));
    // the parent is rewritten but keeps its kids
    assert_eq!(
        written_dict(&outcome, address)["Kids"],
        Object::Array(vec![Object::Reference(line1)])
    );
}

#[test]
fn test_untargeted_fields_are_unchanged_except_materialized_kids() {
    let mut b = FormBuilder::new();
    let name = b.add(text_widget("Name", vec![("V", text("old"))]));
    let inline_kid = text_widget("Zip", vec![]);
    let address = b.add(dict(vec![
        ("T", text("Address")),
        ("Kids", Object::Array(vec![Object::Dictionary(inline_kid.clone())])),
    ]));
    let (doc, _) = b.finish(vec![name, address], vec![]);
    let first_new_id = doc.max_id() + 1;

    let outcome = fill_form(&doc, &FieldValues::new(), &FillOptions::default()).unwrap();

    assert!(outcome.matched.is_empty());
    assert_eq!(&outcome.objects[&name], doc.get(name).unwrap());

    let kid_id = ObjectRef::new(first_new_id, 0);
    let rewritten = written_dict(&outcome, address);
    assert_eq!(rewritten["Kids"], Object::Array(vec![Object::Reference(kid_id)]));
    assert_eq!(rewritten["T"], text("Address"));
    assert_eq!(outcome.objects[&kid_id], Object::Dictionary(inline_kid));
}

#[test]
fn test_nameless_child_keeps_parent_prefix() {
    let mut b = FormBuilder::new();
    let widget = b.add(dict(vec![
        ("FT", Object::name("Tx")),
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(50, 10)),
    ]));
    let parent = b.add(dict(vec![
        ("T", text("A")),
        ("Kids", Object::Array(vec![Object::Reference(widget)])),
    ]));
    let (doc, _) = b.finish(vec![parent], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("A.", Value::from("x"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert!(outcome.matched.contains("A."));
    assert_eq!(written_dict(&outcome, widget)["V"], text("x"));
}

fn checkbox(b: &mut FormBuilder) -> ObjectRef {
    let off = b.stream(b"");
    let yes = b.stream(b"q 0 g BT ET Q");
    b.add(dict(vec![
        ("FT", Object::name("Btn")),
        ("T", text("Agree")),
        ("Subtype", Object::name("Widget")),
        ("V", Object::name("Off")),
        ("AS", Object::name("Off")),
        (
            "AP",
            Object::Dictionary(dict(vec![(
                "N",
                Object::Dictionary(dict(vec![
                    ("Off", Object::Reference(off)),
                    ("Yes", Object::Reference(yes)),
                ])),
            )])),
        ),
    ]))
}

#[test]
fn test_checkbox_on_and_off() {
    let mut b = FormBuilder::new();
    let agree = checkbox(&mut b);
    let (doc, _) = b.finish(vec![agree], vec![]);

    let on = fill_form(
        &doc,
        &values(vec![("Agree", Value::Boolean(true))]),
        &FillOptions::default(),
    )
    .unwrap();
    let field = written_dict(&on, agree);
    assert_eq!(field["AS"], Object::name("Yes"));
    assert_eq!(field["V"], Object::name("Yes"));

    let off = fill_form(
        &doc,
        &values(vec![("Agree", Value::Boolean(false))]),
        &FillOptions::default(),
    )
    .unwrap();
    let field = written_dict(&off, agree);
    assert_eq!(field["AS"], Object::name("Off"));
    assert_eq!(field["V"], Object::name("Off"));

    let explicit_off = fill_form(
        &doc,
        &values(vec![("Agree", Value::Off)]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(written_dict(&explicit_off, agree)["AS"], Object::name("Off"));
}

#[test]
fn test_checkbox_truthy_string() {
    let mut b = FormBuilder::new();
    let agree = checkbox(&mut b);
    let (doc, _) = b.finish(vec![agree], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Agree", Value::from("yes please"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(written_dict(&outcome, agree)["AS"], Object::name("Yes"));
}

#[test]
fn test_checkbox_without_appearance_is_an_error() {
    let mut b = FormBuilder::new();
    let agree = b.add(dict(vec![
        ("FT", Object::name("Btn")),
        ("T", text("Agree")),
        ("Subtype", Object::name("Widget")),
    ]));
    let (doc, _) = b.finish(vec![agree], vec![]);

    match fill_form(
        &doc,
        &values(vec![("Agree", Value::Boolean(true))]),
        &FillOptions::default(),
    ) {
        Err(Error::MissingEntry { key, .. }) => assert_eq!(key, "AP"),
        other => panic!("Expected MissingEntry, got {:?}", other),
    }
}

fn radio_group(b: &mut FormBuilder) -> (ObjectRef, Vec<ObjectRef>) {
    let mut kids = Vec::new();
    for state in ["Red", "Green", "Blue"] {
        let on = b.stream(b"q Q");
        let off = b.stream(b"");
        kids.push(b.add(dict(vec![
            ("Subtype", Object::name("Widget")),
            ("Rect", rect(10, 10)),
            ("AS", Object::name("Off")),
            (
                "AP",
                Object::Dictionary(dict(vec![(
                    "N",
                    Object::Dictionary(dict(vec![
                        ("Off", Object::Reference(off)),
                        (state, Object::Reference(on)),
                    ])),
                )])),
            ),
        ])));
    }
    let group = b.add(dict(vec![
        ("FT", Object::name("Btn")),
        ("Ff", Object::Integer(49152)),
        ("T", text("Color")),
        (
            "Kids",
            Object::Array(kids.iter().copied().map(Object::Reference).collect()),
        ),
    ]));
    (group, kids)
}

#[test]
fn test_radio_group_selects_one_kid() {
    let mut b = FormBuilder::new();
    let (group, kids) = radio_group(&mut b);
    let (doc, _) = b.finish(vec![group], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Color", Value::Integer(1))]),
        &FillOptions::default(),
    )
    .unwrap();

    assert_eq!(written_dict(&outcome, group)["V"], Object::name("Green"));
    assert_eq!(written_dict(&outcome, kids[0])["AS"], Object::name("Off"));
    assert_eq!(written_dict(&outcome, kids[1])["AS"], Object::name("Green"));
    assert_eq!(written_dict(&outcome, kids[2])["AS"], Object::name("Off"));
    // the rest of each widget is untouched
    assert_eq!(
        written_dict(&outcome, kids[1])["AP"],
        doc.get(kids[1]).unwrap().as_dict().unwrap()["AP"]
    );
}

#[test]
fn test_radio_group_index_from_string() {
    let mut b = FormBuilder::new();
    let (group, kids) = radio_group(&mut b);
    let (doc, _) = b.finish(vec![group], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Color", Value::from("2"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(written_dict(&outcome, group)["V"], Object::name("Blue"));
    assert_eq!(written_dict(&outcome, kids[2])["AS"], Object::name("Blue"));
}

#[test]
fn test_radio_group_off_and_out_of_range() {
    let mut b = FormBuilder::new();
    let (group, kids) = radio_group(&mut b);
    let (doc, _) = b.finish(vec![group], vec![]);

    for value in [Value::Off, Value::Integer(7), Value::Integer(-1)] {
        let outcome = fill_form(
            &doc,
            &values(vec![("Color", value.clone())]),
            &FillOptions::default(),
        )
        .unwrap();
        assert_eq!(written_dict(&outcome, group)["V"], Object::name("Off"), "{:?}", value);
        for kid in &kids {
            assert_eq!(written_dict(&outcome, *kid)["AS"], Object::name("Off"));
        }
    }
}

#[test]
fn test_push_button_is_left_unchanged() {
    let mut b = FormBuilder::new();
    let button = b.add(dict(vec![
        ("FT", Object::name("Btn")),
        ("Ff", Object::Integer(65536)),
        ("T", text("Submit")),
        ("Subtype", Object::name("Widget")),
    ]));
    let signature = b.add(dict(vec![
        ("FT", Object::name("Sig")),
        ("T", text("Sign")),
        ("Subtype", Object::name("Widget")),
    ]));
    let (doc, _) = b.finish(vec![button, signature], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Submit", Value::Boolean(true)), ("Sign", Value::from("me"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(&outcome.objects[&button], doc.get(button).unwrap());
    assert_eq!(&outcome.objects[&signature], doc.get(signature).unwrap());
}

#[test]
fn test_appearance_keeps_content_around_marked_span() {
    let mut b = FormBuilder::new();
    let prior = b.stream(b"q 1 0 0 RG /Tx BMC\r\n(old) Tj EMC Q");
    let field = b.add(text_widget(
        "Note",
        vec![(
            "AP",
            Object::Dictionary(dict(vec![("N", Object::Reference(prior))])),
        )],
    ));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Note", Value::from("new"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let (_, content) = appearance(&outcome, written_dict(&outcome, field));
    assert!(content.starts_with("q 1 0 0 RG /Tx BMC\n"), "{}", content);
    assert!(content.ends_with("EMC Q"), "{}", content);
    assert!(content.contains("(new) Tj"));
    assert!(!content.contains("(old)"));
    // the prior stream object itself is not rewritten
    assert!(!outcome.objects.contains_key(&prior));
}

#[test]
fn test_choice_list_value() {
    let mut b = FormBuilder::new();
    let field = b.add(dict(vec![
        ("FT", Object::name("Ch")),
        ("Ff", Object::Integer(1 << 21)),
        ("T", text("Langs")),
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(80, 40)),
        ("Opt", Object::Array(vec![text("A"), text("B"), text("C")])),
    ]));
    let (doc, _) = b.finish(vec![field], vec![("DA", text("/Helv 9 Tf 0 g"))]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Langs", Value::from(vec!["A", "B"]))]),
        &FillOptions::default(),
    )
    .unwrap();
    let written = written_dict(&outcome, field);
    assert_eq!(written["V"], Object::Array(vec![text("A"), text("B")]));
    assert_eq!(written["Opt"], Object::Array(vec![text("A"), text("B"), text("C")]));
    let (_, content) = appearance(&outcome, written);
    assert!(content.contains("(A) Tj"));
    assert!(!content.contains("(B) Tj"));
    // form-level default appearance is used when the field has none
    assert!(content.contains("/Helv 9 Tf 0 g"));
}

#[test]
fn test_choice_single_value() {
    let mut b = FormBuilder::new();
    let field = b.add(dict(vec![
        ("FT", Object::name("Ch")),
        ("T", text("Country")),
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(80, 20)),
    ]));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Country", Value::from("Canada"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let written = written_dict(&outcome, field);
    assert_eq!(written["V"], text("Canada"));
    assert!(appearance(&outcome, written).1.contains("(Canada) Tj"));
}

#[test]
fn test_right_aligned_text_with_layout() {
    let mut b = FormBuilder::new();
    let field = b.add(text_widget("Amount", vec![("Q", Object::Integer(2))]));
    let (doc, _) = b.finish(vec![field], vec![]);

    let options = FillOptions::default().with_text_layout(Arc::new(FixedLayout));
    let outcome = fill_form(&doc, &values(vec![("Amount", Value::Integer(198))]), &options).unwrap();

    let written = written_dict(&outcome, field);
    assert_eq!(written["V"], text("198"));
    let (xobject, content) = appearance(&outcome, written);
    assert!(content.contains("/F0 10 Tf\n60 5 Td\n(198) Tj"), "{}", content);
    let fonts = xobject["Resources"].as_dict().unwrap()["Font"].as_dict().unwrap();
    assert!(fonts.contains_key("F0"));
}

#[test]
fn test_inherited_quadding_centers_text() {
    let mut b = FormBuilder::new();
    let widget = b.add(dict(vec![
        ("T", text("Total")),
        ("Subtype", Object::name("Widget")),
        ("Rect", Object::Array(vec![
            Object::Real(10.0),
            Object::Real(10.0),
            Object::Real(110.0),
            Object::Real(30.0),
        ])),
    ]));
    let parent = b.add(dict(vec![
        ("T", text("Order")),
        ("FT", Object::name("Tx")),
        ("Q", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(widget)])),
    ]));
    let (doc, _) = b.finish(vec![parent], vec![]);

    let options = FillOptions::default().with_text_layout(Arc::new(FixedLayout));
    let outcome =
        fill_form(&doc, &values(vec![("Order.Total", Value::from("9"))]), &options).unwrap();
    let (_, content) = appearance(&outcome, written_dict(&outcome, widget));
    assert!(content.contains("30 5 Td"), "{}", content);
}

#[test]
fn test_resources_copied_from_form_defaults() {
    let mut b = FormBuilder::new();
    let helv = b.add(dict(vec![("BaseFont", Object::name("Helvetica"))]));
    let field = b.add(text_widget("Name", vec![]));
    let dr = Object::Dictionary(dict(vec![
        ("Font", Object::Dictionary(dict(vec![("Helv", Object::Reference(helv))]))),
        ("ProcSet", Object::Array(vec![Object::name("PDF"), Object::name("Text")])),
        ("ColorSpace", Object::Dictionary(Dictionary::new())),
    ]));
    let (doc, _) = b.finish(vec![field], vec![("DR", dr)]);
    let input = values(vec![("Name", Value::from("Eric"))]);

    let plain = fill_form(&doc, &input, &FillOptions::default()).unwrap();
    let (xobject, _) = appearance(&plain, written_dict(&plain, field));
    let resources = xobject["Resources"].as_dict().unwrap();
    assert!(!resources.contains_key("ProcSet"));
    assert!(resources.contains_key("ColorSpace"));
    assert_eq!(
        resources["Font"].as_dict().unwrap()["Helv"],
        Object::Reference(helv)
    );

    let measured = fill_form(
        &doc,
        &input,
        &FillOptions::default().with_text_layout(Arc::new(FixedLayout)),
    )
    .unwrap();
    let (xobject, _) = appearance(&measured, written_dict(&measured, field));
    let fonts = xobject["Resources"].as_dict().unwrap()["Font"].as_dict().unwrap();
    assert!(fonts.contains_key("F0"));
    assert!(!fonts.contains_key("Helv"));
}

#[test]
fn test_text_appearance_on_first_kid() {
    let mut b = FormBuilder::new();
    let first = b.add(dict(vec![
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(60, 12)),
    ]));
    let second = b.add(dict(vec![
        ("Subtype", Object::name("Widget")),
        ("Rect", rect(60, 12)),
    ]));
    let field = b.add(dict(vec![
        ("FT", Object::name("Tx")),
        ("T", text("Email")),
        ("V", text("old@example.com")),
        (
            "Kids",
            Object::Array(vec![Object::Reference(first), Object::Reference(second)]),
        ),
    ]));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Email", Value::from("new@example.com"))]),
        &FillOptions::default(),
    )
    .unwrap();

    let written = written_dict(&outcome, field);
    assert_eq!(written["V"], text("new@example.com"));
    assert!(!written.contains_key("AP"));
    assert_eq!(
        written["Kids"],
        Object::Array(vec![Object::Reference(first), Object::Reference(second)])
    );

    let (xobject, content) = appearance(&outcome, written_dict(&outcome, first));
    assert_eq!(xobject["BBox"], rect(60, 12));
    assert!(content.contains("(new@example.com) Tj"));
    assert_eq!(&outcome.objects[&second], doc.get(second).unwrap());
}

#[test]
fn test_rich_text_writes_rv() {
    let mut b = FormBuilder::new();
    let field = b.add(text_widget(
        "Bio",
        vec![
            ("Ff", Object::Integer(1 << 25)),
            ("RV", text("<p>old</p>")),
        ],
    ));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Bio", Value::from("plain"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let written = written_dict(&outcome, field);
    assert_eq!(written["V"], text("plain"));
    assert_eq!(written["RV"], text("plain"));
}

#[test]
fn test_non_latin_value_written_as_utf16() {
    let mut b = FormBuilder::new();
    let field = b.add(text_widget("Name", vec![]));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Name", Value::from("\u{0416}"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(
        written_dict(&outcome, field)["V"],
        Object::String(vec![0xFE, 0xFF, 0x04, 0x16])
    );
}

#[test]
fn test_inline_acroform_moves_to_own_object() {
    let mut doc = Document::new();
    let field = doc.add_object(text_widget("City", vec![]));
    let catalog = doc.add_object(dict(vec![
        ("Type", Object::name("Catalog")),
        (
            "AcroForm",
            Object::Dictionary(dict(vec![(
                "Fields",
                Object::Array(vec![Object::Reference(field)]),
            )])),
        ),
    ]));
    doc.set_root(catalog);

    let outcome = fill_form(
        &doc,
        &values(vec![("City", Value::from("Oslo"))]),
        &FillOptions::default(),
    )
    .unwrap();

    let new_catalog = written_dict(&outcome, catalog);
    assert_eq!(new_catalog["Type"], Object::name("Catalog"));
    let form_id = new_catalog["AcroForm"].as_reference().expect("AcroForm reference");
    assert!(form_id.id > field.id);
    assert_eq!(
        written_dict(&outcome, form_id)["Fields"],
        Object::Array(vec![Object::Reference(field)])
    );
    assert_eq!(written_dict(&outcome, field)["V"], text("Oslo"));
}

#[test]
fn test_inline_top_level_field_is_materialized() {
    let mut doc = Document::new();
    let form_id = doc.add_object(dict(vec![(
        "Fields",
        Object::Array(vec![Object::Dictionary(text_widget("Zip", vec![]))]),
    )]));
    let catalog = doc.add_object(dict(vec![("AcroForm", Object::Reference(form_id))]));
    doc.set_root(catalog);
    let new_id = ObjectRef::new(doc.max_id() + 1, 0);

    let outcome = fill_form(
        &doc,
        &values(vec![("Zip", Value::from("0150"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(
        written_dict(&outcome, form_id)["Fields"],
        Object::Array(vec![Object::Reference(new_id)])
    );
    assert_eq!(written_dict(&outcome, new_id)["V"], text("0150"));
}

#[test]
fn test_missing_catalog_and_form() {
    let doc = Document::new();
    assert!(matches!(
        fill_form(&doc, &FieldValues::new(), &FillOptions::default()),
        Err(Error::MissingCatalog)
    ));

    let mut doc = Document::new();
    let catalog = doc.add_object(dict(vec![("AcroForm", Object::Reference(ObjectRef::new(40, 0)))]));
    doc.set_root(catalog);
    assert!(matches!(
        fill_form(&doc, &FieldValues::new(), &FillOptions::default()),
        Err(Error::MissingForm)
    ));
}

#[test]
fn test_missing_field_object_is_an_error() {
    let b = FormBuilder::new();
    let (doc, _) = b.finish(vec![ObjectRef::new(77, 0)], vec![]);
    assert!(matches!(
        fill_form(&doc, &FieldValues::new(), &FillOptions::default()),
        Err(Error::ObjectNotFound(r)) if r == ObjectRef::new(77, 0)
    ));
}

#[test]
fn test_cycle_is_detected() {
    let mut doc = Document::new();
    let looped = ObjectRef::new(1, 0);
    doc.insert(
        looped,
        Object::Dictionary(dict(vec![
            ("T", text("Loop")),
            ("Kids", Object::Array(vec![Object::Reference(looped)])),
        ])),
    );
    let form = doc.add_object(dict(vec![(
        "Fields",
        Object::Array(vec![Object::Reference(looped)]),
    )]));
    let catalog = doc.add_object(dict(vec![("AcroForm", Object::Reference(form))]));
    doc.set_root(catalog);

    assert!(matches!(
        fill_form(&doc, &FieldValues::new(), &FillOptions::default()),
        Err(Error::CircularReference(r)) if r == looped
    ));
}

#[test]
fn test_depth_limit() {
    let mut b = FormBuilder::new();
    let mut node = b.add(text_widget("leaf", vec![]));
    for level in 0..5 {
        node = b.add(dict(vec![
            ("T", text(&format!("n{}", level))),
            ("Kids", Object::Array(vec![Object::Reference(node)])),
        ]));
    }
    let (doc, _) = b.finish(vec![node], vec![]);

    assert!(matches!(
        fill_form(&doc, &FieldValues::new(), &FillOptions::default().with_max_depth(3)),
        Err(Error::RecursionLimitExceeded(3))
    ));
    assert!(fill_form(&doc, &FieldValues::new(), &FillOptions::default()).is_ok());
}

#[test]
fn test_apply_outcome_to_document() {
    let mut b = FormBuilder::new();
    let city = b.add(text_widget("City", vec![]));
    let (mut doc, _) = b.finish(vec![city], vec![]);
    let before = doc.max_id();

    let outcome = fill_form(
        &doc,
        &values(vec![("City", Value::from("Rome"))]),
        &FillOptions::default(),
    )
    .unwrap();
    doc.apply(outcome.objects);

    let field = doc.get(city).unwrap().as_dict().unwrap();
    assert_eq!(field["V"], text("Rome"));
    assert!(doc.max_id() > before);

    // a second fill over the filled document replaces the previous appearance region
    let again = fill_form(
        &doc,
        &values(vec![("City", Value::from("Milan"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let (_, content) = appearance(&again, written_dict(&again, city));
    assert!(content.contains("(Milan) Tj"));
    assert!(!content.contains("Rome"));
}

#[test]
fn test_field_listed_twice_is_not_a_cycle() {
    let mut b = FormBuilder::new();
    let city = b.add(text_widget("City", vec![]));
    let (doc, _) = b.finish(vec![city, city], vec![]);

    let untouched = fill_form(&doc, &FieldValues::new(), &FillOptions::default()).unwrap();
    assert_eq!(&untouched.objects[&city], doc.get(city).unwrap());

    let filled = fill_form(
        &doc,
        &values(vec![("City", Value::from("Lima"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert_eq!(written_dict(&filled, city)["V"], text("Lima"));

    let listed = list_fields(&doc, DEFAULT_MAX_DEPTH).unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|f| f.name == "City"));
}

#[test]
fn test_flate_compressed_prior_appearance_is_spliced() {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"q 1 g 0 0 100 20 re f /Tx BMC (old) Tj EMC Q").unwrap();
    let compressed = encoder.finish().unwrap();

    let mut b = FormBuilder::new();
    let prior = b.add(Object::Stream {
        dict: dict(vec![
            ("Subtype", Object::name("Form")),
            ("Filter", Object::name("FlateDecode")),
        ]),
        data: bytes::Bytes::from(compressed),
    });
    let field = b.add(text_widget(
        "Note",
        vec![(
            "AP",
            Object::Dictionary(dict(vec![("N", Object::Reference(prior))])),
        )],
    ));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Note", Value::from("new"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let (xobject, content) = appearance(&outcome, written_dict(&outcome, field));
    assert!(!xobject.contains_key("Filter"));
    assert!(content.starts_with("q 1 g 0 0 100 20 re f /Tx BMC\n"), "{}", content);
    assert!(content.ends_with("EMC Q"), "{}", content);
    assert!(content.contains("(new) Tj"));
    assert!(!content.contains("(old)"));
}

#[test]
fn test_undecodable_prior_appearance_is_regenerated() {
    let mut b = FormBuilder::new();
    let prior = b.add(Object::Stream {
        dict: dict(vec![
            ("Subtype", Object::name("Form")),
            ("Filter", Object::name("ASCII85Decode")),
        ]),
        data: bytes::Bytes::from_static(b"87cURD]i,\"Ebo80~>"),
    });
    let field = b.add(text_widget(
        "Note",
        vec![
            ("DA", text("/Helv 0 Tf 0 g")),
            (
                "AP",
                Object::Dictionary(dict(vec![("N", Object::Reference(prior))])),
            ),
        ],
    ));
    let (doc, _) = b.finish(vec![field], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Note", Value::from("fresh"))]),
        &FillOptions::default(),
    )
    .unwrap();
    let (_, content) = appearance(&outcome, written_dict(&outcome, field));
    assert_eq!(
        content,
        "/Tx BMC\nq\nBT\n/Helv 0 Tf 0 g\n(fresh) Tj\nET\nQ\nEMC"
    );
}

#[test]
fn test_field_without_known_type_is_copied() {
    let mut b = FormBuilder::new();
    let untyped = b.add(dict(vec![
        ("T", text("Plain")),
        ("Subtype", Object::name("Widget")),
        ("V", text("keep")),
    ]));
    let odd = b.add(dict(vec![
        ("FT", Object::name("Zz")),
        ("T", text("Odd")),
        ("Subtype", Object::name("Widget")),
    ]));
    let (doc, _) = b.finish(vec![untyped, odd], vec![]);

    let outcome = fill_form(
        &doc,
        &values(vec![("Plain", Value::from("x")), ("Odd", Value::from("y"))]),
        &FillOptions::default(),
    )
    .unwrap();
    assert!(outcome.matched.contains("Plain"));
    assert!(outcome.matched.contains("Odd"));
    assert_eq!(&outcome.objects[&untyped], doc.get(untyped).unwrap());
    assert_eq!(&outcome.objects[&odd], doc.get(odd).unwrap());
}
