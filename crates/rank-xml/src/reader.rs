//! Ranks.xml parsing.
//!
//! The document is first read into a small element tree, then mapped onto
//! the rank model. Consecutive numbering in the file is not trusted: ranks
//! named with a trailing numeral are regrouped under one parent per base
//! name and renumbered by threshold.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use rank_model::{RankHierarchy, StationAssignment, Vehicle, split_numeral_suffix};
use tracing::{debug, warn};

use crate::elements::{
    MODEL_ATTR, NAME, OUTFIT, OUTFITS, RANK, RANKS, REQUIRED_POINTS, SALARY, STATION,
    STATION_NAME, STATIONS, STYLE_ID, VEHICLE, VEHICLES, ZONE, ZONES,
};
use crate::error::{Result, XmlError};

/// Parse a ranks document into top-level ranks.
pub fn parse_ranks_xml(text: &str) -> Result<Vec<RankHierarchy>> {
    let root = read_tree(text)?;
    if root.name != RANKS {
        return Err(XmlError::Structure(format!(
            "expected <{RANKS}> root element, found <{}>",
            root.name
        )));
    }

    let flat = root
        .children_named(RANK)
        .map(parse_rank)
        .collect::<Result<Vec<_>>>()?;
    let rank_count = flat.len();
    let ranks = group_pay_bands(flat);
    debug!(
        ranks = rank_count,
        top_level = ranks.len(),
        "ranks document parsed"
    );
    Ok(ranks)
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    /// Raw (still escaped) character data.
    raw_text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = utf8(attribute.key.local_name().as_ref())?.to_string();
            let value = unescape(utf8(&attribute.value)?)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name: utf8(start.local_name().as_ref())?.to_string(),
            attributes,
            ..Self::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn text(&self) -> Result<String> {
        Ok(unescape(&self.raw_text)?.trim().to_string())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn child_text(&self, name: &str) -> Result<String> {
        self.child(name).map_or_else(|| Ok(String::new()), Element::text)
    }

    fn child_number<T: std::str::FromStr + Default>(&self, name: &str) -> Result<T> {
        let Some(child) = self.child(name) else {
            return Ok(T::default());
        };
        let value = child.text()?;
        value.parse().map_err(|_| XmlError::InvalidNumber {
            element: name.to_string(),
            value,
        })
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|error| XmlError::Structure(error.to_string()))
}

fn read_tree(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Structure("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.raw_text.push_str(utf8(&text)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    current.raw_text.push('&');
                    current.raw_text.push_str(utf8(&reference)?);
                    current.raw_text.push(';');
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.raw_text.push_str(&escape(utf8(&data)?));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Structure(
            "document ended inside an element".to_string(),
        ));
    }
    root.ok_or_else(|| XmlError::Structure("document has no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::Structure(
            "document has more than one root element".to_string(),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn parse_rank(element: &Element) -> Result<RankHierarchy> {
    let mut rank = RankHierarchy::new(
        element.child_text(NAME)?,
        element.child_number(REQUIRED_POINTS)?,
        element.child_number(SALARY)?,
    );

    for child in &element.children {
        match child.name.as_str() {
            STATIONS => {
                for station in child.children_named(STATION) {
                    rank.stations.push(parse_station(station)?);
                }
            }
            VEHICLES => rank.vehicles = parse_vehicles(child)?,
            OUTFITS => rank.outfits = parse_outfits(child)?,
            _ => {}
        }
    }
    Ok(rank)
}

fn parse_station(element: &Element) -> Result<StationAssignment> {
    let mut station = StationAssignment::new(element.child_text(STATION_NAME)?)
        .with_style(element.child_number(STYLE_ID)?);

    for child in &element.children {
        match child.name.as_str() {
            ZONES => {
                station.zones = child
                    .children_named(ZONE)
                    .map(Element::text)
                    .collect::<Result<Vec<_>>>()?;
            }
            VEHICLES => station.vehicles = parse_vehicles(child)?,
            OUTFITS => station.outfits = parse_outfits(child)?,
            _ => {}
        }
    }
    Ok(station)
}

fn parse_vehicles(element: &Element) -> Result<Vec<Vehicle>> {
    let mut vehicles = Vec::new();
    for vehicle in element.children_named(VEHICLE) {
        let Some(model) = vehicle.attribute(MODEL_ATTR) else {
            warn!("skipping <{VEHICLE}> without a {MODEL_ATTR} attribute");
            continue;
        };
        vehicles.push(Vehicle::new(model, vehicle.text()?));
    }
    Ok(vehicles)
}

fn parse_outfits(element: &Element) -> Result<Vec<String>> {
    element
        .children_named(OUTFIT)
        .map(Element::text)
        .collect()
}

enum Slot {
    Standalone(RankHierarchy),
    Group(String, usize),
}

fn group_pay_bands(flat: Vec<RankHierarchy>) -> Vec<RankHierarchy> {
    let mut slots = Vec::new();
    let mut groups: Vec<Vec<RankHierarchy>> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for rank in flat {
        let base = split_numeral_suffix(&rank.name).map(|(base, _)| base.to_string());
        match base {
            Some(base) => match group_index.get(&base) {
                Some(&index) => groups[index].push(rank),
                None => {
                    group_index.insert(base.clone(), groups.len());
                    slots.push(Slot::Group(base, groups.len()));
                    groups.push(vec![rank]);
                }
            },
            None => slots.push(Slot::Standalone(rank)),
        }
    }

    slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Standalone(rank) => rank,
            Slot::Group(base, index) => build_parent(base, std::mem::take(&mut groups[index])),
        })
        .collect()
}

fn build_parent(base: String, mut bands: Vec<RankHierarchy>) -> RankHierarchy {
    bands.sort_by_key(|band| band.required_points);
    let (required_points, salary) = bands
        .first()
        .map_or((0, 0), |band| (band.required_points, band.salary));

    let mut parent = RankHierarchy::new(base, required_points, salary);
    for band in bands {
        parent.insert_pay_band(usize::MAX, band);
    }
    parent.renumber_pay_bands();
    parent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_numbers_default_to_zero() {
        let ranks =
            parse_ranks_xml("<Ranks><Rank><Name>Recruit</Name></Rank></Ranks>").unwrap();
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[0].required_points, 0);
        assert_eq!(ranks[0].salary, 0);
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let ranks = parse_ranks_xml(
            "<Ranks><Rank><Name>Cadet &amp; Trainee</Name>\
             <Outfits><Outfit><![CDATA[LSPD.<Class A>]]></Outfit></Outfits></Rank></Ranks>",
        )
        .unwrap();
        assert_eq!(ranks[0].name, "Cadet & Trainee");
        assert_eq!(ranks[0].outfits, vec!["LSPD.<Class A>".to_string()]);
    }

    #[test]
    fn vehicle_without_model_is_skipped() {
        let ranks = parse_ranks_xml(
            "<Ranks><Rank><Name>Recruit</Name><Vehicles>\
             <Vehicle>Nameless</Vehicle><Vehicle model=\"police\"/></Vehicles></Rank></Ranks>",
        )
        .unwrap();
        assert_eq!(ranks[0].vehicles.len(), 1);
        assert_eq!(ranks[0].vehicles[0].model, "police");
        assert_eq!(ranks[0].vehicles[0].display_name, "");
    }

    #[test]
    fn second_root_is_rejected() {
        let error = parse_ranks_xml("<Ranks/><Ranks/>").unwrap_err();
        assert!(matches!(error, XmlError::Structure(_) | XmlError::Xml(_)));
    }
}
