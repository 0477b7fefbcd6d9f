//! Ranks.xml generation.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rank_model::{RankHierarchy, StationAssignment, Vehicle, flatten_ranks};
use tracing::debug;

use crate::elements::{
    MODEL_ATTR, NAME, OUTFIT, OUTFITS, RANK, RANKS, REQUIRED_POINTS, SALARY, STATION,
    STATION_NAME, STATIONS, STYLE_ID, VEHICLE, VEHICLES, ZONE, ZONES,
};
use crate::error::{Result, XmlError};

/// Render the ranks document as a string.
pub fn generate_ranks_xml(ranks: &[RankHierarchy]) -> Result<String> {
    let mut buffer = Vec::new();
    write_ranks_xml(&mut buffer, ranks)?;
    String::from_utf8(buffer).map_err(|error| XmlError::Structure(error.to_string()))
}

/// Write the ranks document.
///
/// Parents are written as their pay bands, in order. The output carries no
/// timestamps, so identical input always produces identical bytes.
pub fn write_ranks_xml<W: Write>(writer: W, ranks: &[RankHierarchy]) -> Result<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new(RANKS)))?;

    let flat = flatten_ranks(ranks);
    for rank in &flat {
        write_rank(&mut xml, rank)?;
    }

    xml.write_event(Event::End(BytesEnd::new(RANKS)))?;
    debug!(ranks = flat.len(), "ranks document written");
    Ok(())
}

fn write_rank<W: Write>(xml: &mut Writer<W>, rank: &RankHierarchy) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(RANK)))?;
    write_text_element(xml, NAME, &rank.name)?;
    write_text_element(xml, REQUIRED_POINTS, &rank.required_points.to_string())?;
    write_text_element(xml, SALARY, &rank.salary.to_string())?;

    if rank.stations.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(STATIONS)))?;
    } else {
        xml.write_event(Event::Start(BytesStart::new(STATIONS)))?;
        for station in &rank.stations {
            write_station(xml, station)?;
        }
        xml.write_event(Event::End(BytesEnd::new(STATIONS)))?;
    }

    write_vehicles(xml, &rank.vehicles)?;
    write_outfits(xml, &rank.outfits)?;
    xml.write_event(Event::End(BytesEnd::new(RANK)))?;
    Ok(())
}

fn write_station<W: Write>(xml: &mut Writer<W>, station: &StationAssignment) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(STATION)))?;
    write_text_element(xml, STATION_NAME, &station.station_name)?;
    write_text_element(xml, STYLE_ID, &station.style_id.to_string())?;

    if station.zones.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(ZONES)))?;
    } else {
        xml.write_event(Event::Start(BytesStart::new(ZONES)))?;
        for zone in &station.zones {
            write_text_element(xml, ZONE, zone)?;
        }
        xml.write_event(Event::End(BytesEnd::new(ZONES)))?;
    }

    // Station overrides are optional in the game format.
    if !station.vehicles.is_empty() {
        write_vehicles(xml, &station.vehicles)?;
    }
    if !station.outfits.is_empty() {
        write_outfits(xml, &station.outfits)?;
    }
    xml.write_event(Event::End(BytesEnd::new(STATION)))?;
    Ok(())
}

fn write_vehicles<W: Write>(xml: &mut Writer<W>, vehicles: &[Vehicle]) -> Result<()> {
    if vehicles.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(VEHICLES)))?;
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new(VEHICLES)))?;
    for vehicle in vehicles {
        let mut start = BytesStart::new(VEHICLE);
        start.push_attribute((MODEL_ATTR, vehicle.model.as_str()));
        if vehicle.display_name.is_empty() {
            xml.write_event(Event::Empty(start))?;
        } else {
            xml.write_event(Event::Start(start))?;
            xml.write_event(Event::Text(BytesText::new(&vehicle.display_name)))?;
            xml.write_event(Event::End(BytesEnd::new(VEHICLE)))?;
        }
    }
    xml.write_event(Event::End(BytesEnd::new(VEHICLES)))?;
    Ok(())
}

fn write_outfits<W: Write>(xml: &mut Writer<W>, outfits: &[String]) -> Result<()> {
    if outfits.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(OUTFITS)))?;
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new(OUTFITS)))?;
    for outfit in outfits {
        write_text_element(xml, OUTFIT, outfit)?;
    }
    xml.write_event(Event::End(BytesEnd::new(OUTFITS)))?;
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_root_only() {
        let xml = generate_ranks_xml(&[]).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<Ranks>"));
        assert!(xml.trim_end().ends_with("</Ranks>"));
        assert!(!xml.contains("<Rank>"));
    }

    #[test]
    fn rank_level_lists_are_always_written() {
        let xml = generate_ranks_xml(&[RankHierarchy::new("Recruit", 0, 100)]).unwrap();
        assert!(xml.contains("<Stations/>"));
        assert!(xml.contains("<Vehicles/>"));
        assert!(xml.contains("<Outfits/>"));
    }

    #[test]
    fn empty_station_overrides_are_omitted() {
        let mut rank = RankHierarchy::new("Recruit", 0, 100);
        rank.stations.push(StationAssignment::new("Mission Row"));
        let xml = generate_ranks_xml(&[rank]).unwrap();
        let station = &xml[xml.find("<Station>").unwrap()..xml.find("</Station>").unwrap()];
        assert!(station.contains("<Zones/>"));
        assert!(!station.contains("Vehicles"));
        assert!(!station.contains("Outfits"));
    }

    #[test]
    fn text_is_escaped() {
        let xml = generate_ranks_xml(&[RankHierarchy::new("Cadet & <Trainee>", 0, 0)]).unwrap();
        assert!(xml.contains("<Name>Cadet &amp; &lt;Trainee&gt;</Name>"));
    }
}
