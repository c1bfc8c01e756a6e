//! Text and choice field values.

use super::inherit::InheritedEnvironment;
use super::materialize::{open_child, write_kids_and_end_object};
use super::rewrite::start_modified_dictionary;
use super::walker::FormFiller;
use super::{appearance_in_field, is_widget};
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::session::{DictionaryToken, IndirectObjectToken};
use crate::text_string::{decode_text_string, encode_text_string};
use crate::value::Value;

impl<'a, R: ObjectReader> FormFiller<'a, R> {
    /// Write a text field (open as `token`) holding `value`, with a new appearance.
    pub(super) fn update_text(
        &mut self,
        token: IndirectObjectToken,
        node: &'a Dictionary,
        value: &Value,
        rich: bool,
        env: &InheritedEnvironment,
        full_name: &str,
    ) -> Result<()> {
        let in_field = appearance_in_field(self.reader, node)?;
        let mut excluded = vec!["V", if in_field { "AP" } else { "Kids" }];
        if rich {
            excluded.push("RV");
        }

        let text = value.to_text();
        let dict = start_modified_dictionary(&mut self.session, node, &excluded)?;
        self.session.write_key("V")?;
        self.session.write_literal_string(encode_text_string(&text))?;
        if rich {
            self.session.write_key("RV")?;
            self.session.write_literal_string(encode_text_string(&text))?;
        }

        self.write_with_appearance(token, dict, node, in_field, &text, env, full_name)
    }

    /// Write a choice field (open as `token`) selecting `value`, with a new appearance.
    ///
    /// A list selects several options and shows the first one.
    pub(super) fn update_choice(
        &mut self,
        token: IndirectObjectToken,
        node: &'a Dictionary,
        value: &Value,
        env: &InheritedEnvironment,
        full_name: &str,
    ) -> Result<()> {
        let in_field = appearance_in_field(self.reader, node)?;
        let excluded = ["V", if in_field { "AP" } else { "Kids" }];
        let dict = start_modified_dictionary(&mut self.session, node, &excluded)?;

        self.session.write_key("V")?;
        let shown = match value {
            Value::List(items) => {
                let array = self.session.start_array()?;
                for item in items {
                    self.session.write_literal_string(encode_text_string(item))?;
                }
                self.session.end_array(array)?;
                items.first().cloned().unwrap_or_default()
            },
            Value::Array(items) => {
                let array = self.session.start_array()?;
                for item in items {
                    self.session.copy_object(item)?;
                }
                self.session.end_array(array)?;
                items
                    .first()
                    .and_then(Object::as_string)
                    .map(decode_text_string)
                    .unwrap_or_default()
            },
            single => {
                let text = single.to_text();
                self.session.write_literal_string(encode_text_string(&text))?;
                text
            },
        };

        self.write_with_appearance(token, dict, node, in_field, &shown, env, full_name)
    }

    /// Point the field's (or its first widget's) `/AP /N` at a new appearance and write it.
    ///
    /// `dict` is the field's open rewritten dictionary. When the appearance lives on the
    /// field, `/AP` is added there. Otherwise the kids are materialized, the first one gets
    /// the new `/AP`, and the rest are written back unchanged.
    fn write_with_appearance(
        &mut self,
        token: IndirectObjectToken,
        dict: DictionaryToken,
        node: &'a Dictionary,
        in_field: bool,
        text: &str,
        env: &InheritedEnvironment,
        full_name: &str,
    ) -> Result<()> {
        let reader = self.reader;
        let form_id = self.session.allocate_id();

        let holder = if in_field {
            self.write_ap_entry(form_id)?;
            self.session.end_dictionary(dict)?;
            self.session.end_object(token)?;
            node
        } else {
            let kids_obj = reader
                .dict_entry(node, "Kids")?
                .ok_or_else(|| Error::missing("Kids", full_name))?;
            let kids = kids_obj
                .as_array()
                .ok_or_else(|| Error::type_mismatch("Array", kids_obj.type_name()))?;
            self.session.write_key("Kids")?;
            let children = write_kids_and_end_object(&mut self.session, dict, token, kids)?;

            let mut holder = None;
            for child in children {
                let (kid_token, kid) = open_child(reader, &mut self.session, child)?;
                if holder.is_none() {
                    if !is_widget(kid) {
                        log::debug!("Field {:?}: first kid is not a widget", full_name);
                    }
                    let kid_dict = start_modified_dictionary(&mut self.session, kid, &["AP"])?;
                    self.write_ap_entry(form_id)?;
                    self.session.end_dictionary(kid_dict)?;
                    self.session.end_object(kid_token)?;
                    holder = Some(kid);
                } else {
                    self.session.write_value(Object::Dictionary(kid.clone()))?;
                    self.session.end_object(kid_token)?;
                }
            }
            holder.ok_or_else(|| Error::missing("Kids", full_name))?
        };

        self.write_text_appearance(form_id, node, holder, text, env, full_name)
    }

    fn write_ap_entry(&mut self, form_id: ObjectRef) -> Result<()> {
        self.session.write_key("AP")?;
        let ap = self.session.start_dictionary()?;
        self.session.write_key("N")?;
        self.session.write_reference(form_id)?;
        self.session.end_dictionary(ap)
    }
}
