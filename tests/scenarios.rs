//! Cross-module scenarios: load, edit, delete and persist through the
//! public API.

use glam::Vec3;
use molview::controller::{LoadPhase, SceneController};
use molview::options::Options;
use molview::store::SecondaryStructure;
use molview::view::{ShowOption, ViewDict, ViewModel, DEFAULT_VIEW_ID};

fn atom_line(
    record: &str,
    serial: usize,
    name: &str,
    res: (&str, char, i32),
    pos: Vec3,
    element: &str,
) -> String {
    let (res_name, chain, res_num) = res;
    let name = if name.len() < 4 {
        format!(" {name:<3}")
    } else {
        name.to_owned()
    };
    format!(
        "{record:<6}{serial:>5} {name:<4} {res_name:>3} {chain}{res_num:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {element:>2}",
        pos.x, pos.y, pos.z, 1.0, 20.0
    )
}

/// Glycine backbones, one chain per entry, chains 20 Å apart in y.
fn peptide_chains(chains: &[(char, usize)], y: f32) -> String {
    let mut lines = Vec::new();
    let mut serial = 1;
    for (k, &(chain, n)) in chains.iter().enumerate() {
        let y = y + 20.0 * k as f32;
        for i in 0..n {
            let x = 3.8 * i as f32;
            let wiggle = if i % 2 == 0 { 0.5 } else { -0.5 };
            for (name, pos) in [
                ("N", Vec3::new(x, y, 0.0)),
                ("CA", Vec3::new(x + 1.45, y + wiggle, 0.0)),
                ("C", Vec3::new(x + 2.5, y, 0.0)),
                ("O", Vec3::new(x + 2.5, y - 1.2, 0.0)),
            ] {
                let element = &name[..1];
                lines.push(atom_line(
                    "ATOM",
                    serial,
                    name,
                    ("GLY", chain, i as i32 + 1),
                    pos,
                    element,
                ));
                serial += 1;
            }
        }
    }
    lines.push("END".to_owned());
    lines.join("\n")
}

fn load(controller: &mut SceneController, id: &str, text: &str) -> usize {
    pollster::block_on(controller.load_structure(
        id,
        text,
        &mut |_: LoadPhase, _: &str| {},
    ))
    .unwrap()
}

#[test]
fn single_ligand_gets_one_default_view() {
    let lines: Vec<String> = (0..56)
        .map(|i| {
            let pos = Vec3::new(
                (i % 4) as f32 * 1.5,
                (i / 4 % 4) as f32 * 1.5,
                (i / 16) as f32 * 1.5,
            );
            atom_line(
                "HETATM",
                i + 1,
                &format!("C{}", i + 1),
                ("LIG", 'A', 1),
                pos,
                "C",
            )
        })
        .collect();
    let text = lines.join("\n");

    let mut controller = SceneController::default();
    let _ = load(&mut controller, "lig", &text);

    let soup = controller.soup();
    assert_eq!(soup.atom_count(), 56);
    assert_eq!(soup.residue_count(), 1);
    assert!(!soup.structures()[0].has_secondary_structure);
    assert_eq!(
        soup.store().residue_proxy(0).ss(),
        SecondaryStructure::Ligand
    );

    let model = controller.view_model();
    assert_eq!(model.view_ids(), ["view:000000"]);
    assert_eq!(model.current_view().id, DEFAULT_VIEW_ID);
    let default = model.saved_view(DEFAULT_VIEW_ID).unwrap();
    assert_eq!(default.order, 0);
    assert!(default.show.ligands);
}

#[test]
fn single_amino_acid_gets_heuristic_coil() {
    let backbone = [
        ("N", Vec3::new(0.0, 0.0, 0.0), "N"),
        ("CA", Vec3::new(1.46, 0.0, 0.0), "C"),
        ("C", Vec3::new(2.0, 1.42, 0.0), "C"),
        ("O", Vec3::new(1.3, 2.4, 0.0), "O"),
        ("CB", Vec3::new(2.0, -0.8, 1.2), "C"),
    ];
    let mut lines: Vec<String> = backbone
        .iter()
        .enumerate()
        .map(|(i, &(name, pos, element))| {
            atom_line("ATOM", i + 1, name, ("ALA", 'A', 1), pos, element)
        })
        .collect();
    for k in 0..51 {
        let pos = Vec3::new(
            -3.0 + (k % 6) as f32 * 1.2,
            4.0 + (k / 6 % 3) as f32 * 1.2,
            (k / 18) as f32 * 1.2,
        );
        lines.push(atom_line(
            "ATOM",
            lines.len() + 1,
            &format!("H{}", k + 1),
            ("ALA", 'A', 1),
            pos,
            "H",
        ));
    }
    lines.push("END".to_owned());
    let text = lines.join("\n");

    let mut controller = SceneController::default();
    let _ = load(&mut controller, "ala", &text);

    let soup = controller.soup();
    assert_eq!(soup.atom_count(), 56);
    assert_eq!(soup.residue_count(), 1);
    assert!(!soup.structures()[0].has_secondary_structure);
    let residue = soup.store().residue_proxy(0);
    assert!(residue.is_polymer());
    assert_eq!(residue.ss(), SecondaryStructure::Coil);

    let model = controller.view_model();
    assert_eq!(model.view_ids(), ["view:000000"]);
    assert_eq!(model.saved_view(DEFAULT_VIEW_ID).unwrap().order, 0);
}

#[test]
fn deleting_a_structure_keeps_labels_on_survivors() {
    let mut controller = SceneController::default();
    let _ = load(&mut controller, "first", &peptide_chains(&[('A', 3)], 0.0));
    let _ = load(&mut controller, "second", &peptide_chains(&[('B', 3)], 40.0));

    let i_atom = 12 + 5;
    controller.add_label(1, "doomed").unwrap();
    controller.add_label(i_atom, "survivor").unwrap();
    controller.add_distance(2, i_atom).unwrap();

    let _ = controller.delete_structure(0).unwrap();

    let view = controller.view_model().current_view();
    assert_eq!(view.labels.len(), 1);
    assert_eq!(view.labels[0].text, "survivor");
    assert_eq!(view.labels[0].i_atom, 5);
    assert!(view.distances.is_empty());

    let store = controller.soup().store();
    let residue = store.atom_proxy(view.labels[0].i_atom).residue();
    assert_eq!(residue.chain(), 'B');
}

#[test]
fn saved_views_survive_the_wire_format() {
    let text = peptide_chains(&[('A', 6)], 0.0);
    let mut controller = SceneController::default();
    let _ = load(&mut controller, "pep", &text);
    controller.select_range(1, 3);
    controller.set_show(ShowOption::Water, true);
    controller.add_label(4, "ca").unwrap();
    controller.set_view_text("active site");
    let id = controller.save_current_view();

    let json = ViewDict::list_to_json(&controller.view_model().view_dicts())
        .unwrap();
    let dicts = ViewDict::list_from_json(&json).unwrap();

    let mut model = ViewModel::new(&Options::default());
    model.build(controller.soup());
    model.import_views(&dicts, None).unwrap();

    assert_eq!(model.view_ids(), controller.view_model().view_ids());
    let original = controller.view_model().saved_view(&id).unwrap();
    let restored = model.saved_view(&id).unwrap();
    assert_eq!(restored.show, original.show);
    assert_eq!(restored.text, "active site");
    assert_eq!(restored.selected_residues, [1, 2, 3]);
    assert_eq!(restored.labels, original.labels);
    assert!(restored.camera.focus.distance(original.camera.focus) < 1e-4);
    assert!(
        restored.camera.position.distance(original.camera.position) < 1e-2
    );
    assert!(restored.camera.up.dot(original.camera.up) > 0.999);
}

#[test]
fn resaving_a_deleted_view_gets_a_fresh_id() {
    let mut controller = SceneController::default();
    let _ = load(&mut controller, "pep", &peptide_chains(&[('A', 4)], 0.0));
    controller.set_show(ShowOption::Sphere, true);

    let first = controller.save_current_view();
    let saved = controller.view_model().saved_view(&first).unwrap().clone();
    controller.delete_view(&first).unwrap();
    assert!(controller.view_model().saved_view(&first).is_none());

    let second = controller.save_current_view();
    assert_ne!(first, second);
    let resaved = controller.view_model().saved_view(&second).unwrap();
    assert_eq!(resaved.show, saved.show);
    assert_eq!(resaved.camera, saved.camera);
    assert_eq!(controller.view_model().view_count(), 2);
}

#[test]
fn chains_become_continuous_traces() {
    let mut controller = SceneController::default();
    let _ = load(
        &mut controller,
        "two",
        &peptide_chains(&[('A', 5), ('B', 4)], 0.0),
    );
    let soup = controller.soup();

    let traces = soup.traces();
    assert_eq!(traces.len(), 2);
    assert_eq!((traces[0].chain, traces[0].len()), ('A', 5));
    assert_eq!((traces[1].chain, traces[1].len()), ('B', 4));

    let store = soup.store();
    for pair in traces[0].residues.windows(2) {
        let c = store.residue_proxy(pair[0]).atom_index("C").unwrap();
        let n = store.residue_proxy(pair[1]).atom_index("N").unwrap();
        assert!(
            soup.bonds().iter().any(|b| b.a == c && b.b == n),
            "missing peptide bond {c}-{n}"
        );
    }

    for trace in traces {
        for w in trace.normals.windows(2) {
            assert!(w[0].dot(w[1]) >= 0.0);
        }
        for (t, n) in trace.tangents.iter().zip(&trace.normals) {
            assert!(t.dot(*n).abs() < 1e-4);
        }
    }
}
