//! Check box and radio button state.
//!
//! A button's on state is named by the non-`Off` key of its widget's `/AP /N` dictionary
//! (ISO 32000-1:2008, Section 12.7.4.2). The chosen name becomes both the field's `/V` and
//! the widget's `/AS`.

use super::materialize::{open_child, write_kids_and_end_object};
use super::rewrite::{start_modified_dictionary, write_name_entry};
use super::walker::FormFiller;
use super::{has_kids, is_widget};
use crate::document::ObjectReader;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use crate::session::IndirectObjectToken;

/// Appearance state name for "off".
pub const OFF_STATE: &str = "Off";

/// Which state a button field should end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every widget off
    Off,
    /// Check box on; in a widget group, the first widget
    On,
    /// Zero-based index into the field's `/Kids`
    Index(i64),
}

impl Selection {
    /// Kid index this selection turns on, if any.
    pub fn target_index(&self) -> Option<usize> {
        match self {
            Selection::Off => None,
            Selection::On => Some(0),
            Selection::Index(i) => usize::try_from(*i).ok(),
        }
    }
}

/// First key of `/AP /N` other than `Off`, if any.
pub fn on_state_name(normal_appearances: &Dictionary) -> Option<&str> {
    normal_appearances
        .keys()
        .map(String::as_str)
        .find(|name| *name != OFF_STATE)
}

impl<'a, R: ObjectReader> FormFiller<'a, R> {
    /// Write a check box or radio button field (open as `token`) in state `selection`.
    pub(super) fn update_button(
        &mut self,
        token: IndirectObjectToken,
        node: &'a Dictionary,
        selection: Selection,
        full_name: &str,
    ) -> Result<()> {
        let reader = self.reader;
        if is_widget(node) || !has_kids(reader, node)? {
            let state = match selection {
                Selection::Off => OFF_STATE.to_string(),
                Selection::On | Selection::Index(_) => self.on_state(node, full_name)?,
            };
            log::log!(self.options.field_log_level(), "Field {:?}: state /{}", full_name, state);

            let dict = start_modified_dictionary(&mut self.session, node, &["V", "AS"])?;
            write_name_entry(&mut self.session, "V", &state)?;
            write_name_entry(&mut self.session, "AS", &state)?;
            self.session.end_dictionary(dict)?;
            return self.session.end_object(token);
        }

        let kids_obj = reader
            .dict_entry(node, "Kids")?
            .ok_or_else(|| Error::missing("Kids", full_name))?;
        let kids = kids_obj
            .as_array()
            .ok_or_else(|| Error::type_mismatch("Array", kids_obj.type_name()))?;

        let target = selection.target_index();
        let state = match target {
            None => OFF_STATE.to_string(),
            Some(index) => match reader.array_entry(kids, index)? {
                Some(kid) => {
                    let kid = kid
                        .as_dict()
                        .ok_or_else(|| Error::type_mismatch("Dictionary", kid.type_name()))?;
                    self.on_state(kid, full_name)?
                },
                None => {
                    log::warn!(
                        "Field {:?}: option {} out of range ({} widgets), switching off",
                        full_name,
                        index,
                        kids.len()
                    );
                    OFF_STATE.to_string()
                },
            },
        };
        if target.is_none() && selection != Selection::Off {
            log::warn!("Field {:?}: negative option index, switching off", full_name);
        }
        log::log!(
            self.options.field_log_level(),
            "Field {:?}: group state /{} at {:?}",
            full_name,
            state,
            target
        );

        let dict = start_modified_dictionary(&mut self.session, node, &["V", "Kids"])?;
        write_name_entry(&mut self.session, "V", &state)?;
        self.session.write_key("Kids")?;
        let children = write_kids_and_end_object(&mut self.session, dict, token, kids)?;

        for (index, child) in children.into_iter().enumerate() {
            let (kid_token, kid) = open_child(reader, &mut self.session, child)?;
            let kid_state = if Some(index) == target {
                state.as_str()
            } else {
                OFF_STATE
            };
            let kid_dict = start_modified_dictionary(&mut self.session, kid, &["AS"])?;
            write_name_entry(&mut self.session, "AS", kid_state)?;
            self.session.end_dictionary(kid_dict)?;
            self.session.end_object(kid_token)?;
        }
        Ok(())
    }

    /// On-state name of `widget`. Missing `/AP` or `/N` is a structural error.
    fn on_state(&self, widget: &Dictionary, full_name: &str) -> Result<String> {
        let reader = self.reader;
        let ap = reader
            .dict_entry(widget, "AP")?
            .ok_or_else(|| Error::missing("AP", format!("button widget of {:?}", full_name)))?;
        let ap = ap
            .as_dict()
            .ok_or_else(|| Error::type_mismatch("Dictionary", ap.type_name()))?;
        let normal = reader
            .dict_entry(ap, "N")?
            .ok_or_else(|| Error::missing("N", format!("appearance of {:?}", full_name)))?;
        let normal = match normal {
            Object::Dictionary(d) => d,
            other => return Err(Error::type_mismatch("Dictionary", other.type_name())),
        };

        match on_state_name(normal) {
            Some(name) => Ok(name.to_string()),
            None => {
                log::warn!("Field {:?}: no on state in /AP /N, switching off", full_name);
                Ok(OFF_STATE.to_string())
            },
        }
    }
}
