//! Static in-memory person records, served alongside the movie catalog.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonRecord {
  pub id: &'static str,
  pub name: &'static str,
  pub age: u8,
  pub gender: &'static str,
}

pub const PEOPLE: &[PersonRecord] = &[
  PersonRecord {
    id: "0",
    name: "gn lee",
    age: 17,
    gender: "female",
  },
  PersonRecord {
    id: "1",
    name: "Jisu",
    age: 18,
    gender: "female",
  },
  PersonRecord {
    id: "2",
    name: "Yumi",
    age: 20,
    gender: "female",
  },
  PersonRecord {
    id: "3",
    name: "Tom",
    age: 15,
    gender: "male",
  },
  PersonRecord {
    id: "4",
    name: "Billy",
    age: 23,
    gender: "male",
  },
];

pub fn get_by_id(id: &str) -> Option<&'static PersonRecord> {
  PEOPLE.iter().find(|p| p.id == id.trim())
}
