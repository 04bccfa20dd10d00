use taskboard::{
    DiagramError, Document, Effect, InputEvent, Interaction, Point, RectF, ShapeType, deserialize,
    serialize,
};

#[test]
fn undersized_frame_resize_is_rejected() {
    let mut doc = Document::new();
    let frame = doc.place_shape(ShapeType::Frame, Point::ZERO);
    let mut ix = Interaction::default();
    ix.select_only(frame);

    ix.handle(&mut doc, InputEvent::PointerDown(Point::new(300.0, 200.0)));
    let effect = ix.handle(&mut doc, InputEvent::PointerMove(Point::new(40.0, 40.0)));
    ix.handle(&mut doc, InputEvent::PointerUp(Point::new(40.0, 40.0)));

    assert_eq!(effect, Effect::Ignored);
    let bounds = doc.shape(frame).unwrap().bounds();
    assert_eq!(
        bounds,
        RectF::from_origin_size(Point::ZERO, 300.0, 200.0)
    );
}

#[test]
fn moving_a_loaded_rectangle_only_touches_its_connection() {
    let text = r#"{
        "shapes": [
            { "type": "Rectangle", "x": 0, "y": 0, "title": "A", "category": "General",
              "description": "", "status": "Todo",
              "custom_bg_color": null, "custom_text_color": null },
            { "type": "Rectangle", "x": 400, "y": 0, "title": "B", "category": "General",
              "description": "", "status": "Todo",
              "custom_bg_color": null, "custom_text_color": null },
            { "type": "Circle", "x": 0, "y": 300, "title": "C", "category": "General",
              "description": "", "status": "Done",
              "custom_bg_color": null, "custom_text_color": null }
        ],
        "connections": [ { "start": 0, "end": 1 }, { "start": 2, "end": 1 } ]
    }"#;
    let mut doc = deserialize(text).unwrap();
    let ids: Vec<_> = doc.shapes().map(|s| s.id()).collect();
    let (a, c) = (ids[0], ids[2]);
    let before: Vec<_> = doc.connections().iter().map(|c| c.endpoints()).collect();

    doc.translate_shape(c, Point::new(50.0, 0.0)).unwrap();

    let after: Vec<_> = doc.connections().iter().map(|c| c.endpoints()).collect();
    assert_eq!(before[0], after[0]);
    assert_ne!(before[1], after[1]);

    doc.translate_shape(a, Point::new(50.0, 0.0)).unwrap();

    let moved: Vec<_> = doc.connections().iter().map(|c| c.endpoints()).collect();
    assert_ne!(after[0], moved[0]);
    assert!((moved[0].0.x - after[0].0.x - 50.0).abs() < 1e-3);
    assert_eq!(after[1], moved[1]);
    for id in &ids {
        let shape = doc.shape(*id).unwrap();
        let (w, h) = shape.shape_type().default_size();
        assert_eq!((shape.width(), shape.height()), (w, h));
    }
    assert_eq!(doc.shape(a).unwrap().position(), Point::new(50.0, 0.0));
    assert_eq!(doc.shape(c).unwrap().position(), Point::new(50.0, 300.0));
}

#[test]
fn removing_a_hub_drops_all_its_connections() {
    let mut doc = Document::new();
    let hub = doc.place_shape(ShapeType::Diamond, Point::ZERO);
    let spokes: Vec<_> = (0..4)
        .map(|i| doc.place_shape(ShapeType::Triangle, Point::new(200.0 * i as f32, 300.0)))
        .collect();
    for (i, s) in spokes.iter().enumerate() {
        if i % 2 == 0 {
            doc.add_connection(hub, *s).unwrap();
        } else {
            doc.add_connection(*s, hub).unwrap();
        }
    }
    doc.add_connection(spokes[0], spokes[1]).unwrap();
    assert_eq!(doc.connection_count(), 5);

    doc.remove_shape(hub).unwrap();

    assert_eq!(doc.connection_count(), 1);
    for conn in doc.connections() {
        assert!(doc.contains_shape(conn.start()) && doc.contains_shape(conn.end()));
    }
    for s in &spokes {
        let shape = doc.shape(*s).unwrap();
        for cid in shape.connections() {
            assert!(doc.connection(*cid).is_some());
        }
    }
    assert!(doc.shape(spokes[2]).unwrap().connections().is_empty());
}

#[test]
fn connection_errors() {
    let mut doc = Document::new();
    let a = doc.place_shape(ShapeType::Rectangle, Point::ZERO);
    let b = doc.place_shape(ShapeType::Circle, Point::new(300.0, 0.0));
    doc.remove_shape(b).unwrap();
    assert!(matches!(
        doc.add_connection(a, a),
        Err(DiagramError::InvalidConnection { .. })
    ));
    assert!(matches!(
        doc.add_connection(b, a),
        Err(DiagramError::ShapeNotFound(id)) if id == b
    ));
}

#[test]
fn edited_board_survives_save_and_load() {
    let mut doc = Document::new();
    let mut ix = Interaction::default();
    for (tool, at) in [
        (ShapeType::Frame, Point::new(-50.0, -50.0)),
        (ShapeType::Rectangle, Point::new(0.0, 0.0)),
        (ShapeType::Circle, Point::new(250.0, 20.0)),
    ] {
        ix.set_tool(taskboard::Tool::Place(tool));
        ix.handle(&mut doc, InputEvent::PointerDown(at));
        ix.handle(&mut doc, InputEvent::PointerUp(at));
    }
    ix.set_tool(taskboard::Tool::Connect);
    ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
    ix.handle(&mut doc, InputEvent::PointerUp(Point::new(300.0, 70.0)));
    assert_eq!(doc.connection_count(), 1);

    let loaded = deserialize(&serialize(&doc).unwrap()).unwrap();
    assert_eq!(loaded.shape_count(), 3);
    let types: Vec<_> = loaded.shapes().map(|s| s.shape_type()).collect();
    assert_eq!(
        types,
        [ShapeType::Frame, ShapeType::Rectangle, ShapeType::Circle]
    );
    let conn = &loaded.connections()[0];
    assert_eq!(
        loaded.shape(conn.start()).unwrap().shape_type(),
        ShapeType::Rectangle
    );
    assert_eq!(
        loaded.shape(conn.end()).unwrap().shape_type(),
        ShapeType::Circle
    );
}
