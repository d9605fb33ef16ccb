//! Document emitters: the vehicle demand document (`<routes>`) and the
//! disruption control document (`<additional>`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::catalog::{EntityCatalog, EntityType};
use crate::disruption::{ClosureRule, SideEffects, SpeedControlZone, StopDescriptor};
use crate::error::Result;
use crate::routes::RouteTable;
use crate::timeline::{DepartureRecord, Timeline};

const INDENT: usize = 4;

/// Departure times are written with two decimals.
fn fmt_depart(t: f64) -> String {
    format!("{t:.2}")
}

/// Window times are written at full precision so the stop, the speed sign and
/// the rerouter name the same instant.
fn fmt_secs(t: f64) -> String {
    t.to_string()
}

/// Derived spans such as `end - start`; rounding to the nanosecond drops the
/// float noise of the subtraction.
fn fmt_span(t: f64) -> String {
    fmt_secs((t * 1e9).round() / 1e9)
}

fn start(name: &str, attrs: &[(&str, String)]) -> BytesStart<'static> {
    let mut elem = BytesStart::new(name.to_string());
    for (key, value) in attrs {
        elem.push_attribute((*key, value.as_str()));
    }
    elem
}

fn xml_writer<W: Write>(inner: W) -> Result<Writer<W>> {
    let mut writer = Writer::new_with_indent(inner, b' ', INDENT);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    Ok(writer)
}

fn finish<W: Write>(writer: Writer<W>) -> Result<()> {
    let mut inner = writer.into_inner();
    inner.write_all(b"\n")?;
    inner.flush()?;
    Ok(())
}

fn vtype_attrs(t: &EntityType) -> Vec<(&'static str, String)> {
    let mut attrs = vec![
        ("id", t.id.clone()),
        ("accel", t.accel.to_string()),
        ("decel", t.decel.to_string()),
    ];
    if let Some(sigma) = t.sigma {
        attrs.push(("sigma", sigma.to_string()));
    }
    attrs.push(("length", t.length.to_string()));
    attrs.push(("maxSpeed", t.max_speed.to_string()));
    attrs.push(("color", t.color.to_string()));
    if let Some(class) = &t.access_class {
        attrs.push(("vClass", class.clone()));
    }
    if let Some(shape) = &t.gui_shape {
        attrs.push(("guiShape", shape.clone()));
    }
    if let Some(lc) = &t.lane_change {
        attrs.push(("lcStrategic", lc.strategic.to_string()));
        attrs.push(("lcCooperative", lc.cooperative.to_string()));
        attrs.push(("lcSpeedGain", lc.speed_gain.to_string()));
    }
    if let Some(min_gap) = t.min_gap {
        attrs.push(("minGap", min_gap.to_string()));
    }
    if let Some(decel) = t.emergency_decel {
        attrs.push(("emergencyDecel", decel.to_string()));
    }
    if t.bluelight {
        attrs.push(("has.bluelight.device", "true".to_string()));
    }
    attrs
}

fn stop_attrs(stop: &StopDescriptor) -> Vec<(&'static str, String)> {
    vec![
        ("lane", stop.lane_id.clone()),
        ("pos", stop.geometry.pos.to_string()),
        ("startPos", stop.geometry.start_pos.to_string()),
        ("endPos", stop.geometry.end_pos.to_string()),
        ("duration", fmt_span(stop.duration)),
        ("until", fmt_secs(stop.until)),
        ("triggered", stop.triggered.to_string()),
        ("parking", stop.parking.to_string()),
    ]
}

fn write_vehicle<W: Write>(writer: &mut Writer<W>, record: &DepartureRecord) -> Result<()> {
    let attrs = [
        ("id", record.sequence_id.to_string()),
        ("type", record.entity_type.clone()),
        ("route", record.route_id.clone()),
        ("depart", fmt_depart(record.depart_time)),
        ("color", record.color.to_string()),
    ];
    match &record.stop {
        None => writer.write_event(Event::Empty(start("vehicle", &attrs)))?,
        Some(stop) => {
            writer.write_event(Event::Start(start("vehicle", &attrs)))?;
            writer.write_event(Event::Empty(start("stop", &stop_attrs(stop))))?;
            writer.write_event(Event::End(BytesEnd::new("vehicle")))?;
        }
    }
    Ok(())
}

/// Write the demand document: vehicle types, routes, then departures in sequence order.
pub fn write_demand_document<W: Write>(
    inner: W,
    catalog: &EntityCatalog,
    routes: &RouteTable,
    timeline: &Timeline,
) -> Result<()> {
    let mut writer = xml_writer(inner)?;
    writer.write_event(Event::Start(BytesStart::new("routes")))?;

    for t in catalog.iter() {
        writer.write_event(Event::Empty(start("vType", &vtype_attrs(t))))?;
    }
    for route in routes.iter() {
        let attrs = [("id", route.id.clone()), ("edges", route.edges())];
        writer.write_event(Event::Empty(start("route", &attrs)))?;
    }
    for record in timeline.records() {
        write_vehicle(&mut writer, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new("routes")))?;
    finish(writer)
}

fn write_zone<W: Write>(writer: &mut Writer<W>, zone: &SpeedControlZone) -> Result<()> {
    let attrs = [("id", zone.id.clone()), ("lanes", zone.lane_id.clone())];
    writer.write_event(Event::Start(start("variableSpeedSign", &attrs)))?;
    for step in &zone.steps {
        let attrs = [
            ("time", fmt_secs(step.time)),
            ("speed", format!("{:.2}", step.speed)),
        ];
        writer.write_event(Event::Empty(start("step", &attrs)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("variableSpeedSign")))?;
    Ok(())
}

fn write_closure<W: Write>(writer: &mut Writer<W>, closure: &ClosureRule) -> Result<()> {
    let attrs = [("id", closure.id.clone()), ("edges", closure.segment_id.clone())];
    writer.write_event(Event::Start(start("rerouter", &attrs)))?;

    let interval = [
        ("begin", fmt_secs(closure.begin)),
        ("end", fmt_secs(closure.end)),
    ];
    writer.write_event(Event::Start(start("interval", &interval)))?;
    let lane = [
        ("id", closure.lane_id.clone()),
        ("allow", closure.allow.join(" ")),
    ];
    writer.write_event(Event::Empty(start("closingLaneReroute", &lane)))?;
    writer.write_event(Event::End(BytesEnd::new("interval")))?;

    writer.write_event(Event::End(BytesEnd::new("rerouter")))?;
    Ok(())
}

/// Write the control document: one speed sign and one rerouter per resolved disruption.
pub fn write_control_document<W: Write>(inner: W, effects: &SideEffects) -> Result<()> {
    let mut writer = xml_writer(inner)?;
    writer.write_event(Event::Start(BytesStart::new("additional")))?;

    for (zone, closure) in effects.zones.iter().zip(&effects.closures) {
        write_zone(&mut writer, zone)?;
        write_closure(&mut writer, closure)?;
    }

    writer.write_event(Event::End(BytesEnd::new("additional")))?;
    finish(writer)
}

pub fn render_demand_document(
    catalog: &EntityCatalog,
    routes: &RouteTable,
    timeline: &Timeline,
) -> Result<String> {
    let mut buf = Vec::new();
    write_demand_document(&mut buf, catalog, routes, timeline)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn render_control_document(effects: &SideEffects) -> Result<String> {
    let mut buf = Vec::new();
    write_control_document(&mut buf, effects)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub(crate) fn create_output_file(path: impl AsRef<Path>) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}
