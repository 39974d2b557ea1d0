//! A four-compound slice of the carcinogenesis ontology.
//!
//! Covers: two-level atom and structure hierarchies, a bond with three
//! incident atoms (`bond3`), a compound without any edges (`d3`), an atom
//! that also carries `owl:NamedIndividual`, an individual of an unknown class
//! (`mystery`) and the Atom-domain `charge` property.

/// Schema plus individuals `d1`..`d4`.
pub const MINI_CARCINOGENESIS: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix c:    <http://dl-learner.org/carcinogenesis#> .

<http://dl-learner.org/carcinogenesis> a owl:Ontology .

# Base classes
c:Compound  a owl:Class .
c:Atom      a owl:Class .
c:Bond      a owl:Class .
c:Structure a owl:Class .

# Atom hierarchy
c:Carbon     a owl:Class ; rdfs:subClassOf c:Atom .
c:Halide     a owl:Class ; rdfs:subClassOf c:Atom .
c:Hydrogen   a owl:Class ; rdfs:subClassOf c:Atom .
c:Nitrogen   a owl:Class ; rdfs:subClassOf c:Atom .
c:Carbon-10  a owl:Class ; rdfs:subClassOf c:Carbon .
c:Carbon-22  a owl:Class ; rdfs:subClassOf c:Carbon .
c:Halogen-Cl a owl:Class ; rdfs:subClassOf c:Halide .
c:Hydrogen-3 a owl:Class ; rdfs:subClassOf c:Hydrogen .
c:Nitro-N    a owl:Class ; rdfs:subClassOf c:Nitrogen .

# Bond hierarchy
c:Bond-1 a owl:Class ; rdfs:subClassOf c:Bond .
c:Bond-2 a owl:Class ; rdfs:subClassOf c:Bond .
c:Bond-7 a owl:Class ; rdfs:subClassOf c:Bond .

# Structure hierarchy
c:Amine    a owl:Class ; rdfs:subClassOf c:Structure .
c:Nitro    a owl:Class ; rdfs:subClassOf c:Structure .
c:Ring     a owl:Class ; rdfs:subClassOf c:Structure .
c:Benzene  a owl:Class ; rdfs:subClassOf c:Ring .
c:Six_ring a owl:Class ; rdfs:subClassOf c:Ring .

# Properties
c:hasAtom      a owl:ObjectProperty ; rdfs:domain c:Compound ; rdfs:range c:Atom .
c:hasBond      a owl:ObjectProperty ; rdfs:domain c:Compound ; rdfs:range c:Bond .
c:hasStructure a owl:ObjectProperty ; rdfs:domain c:Compound ; rdfs:range c:Structure .
c:inBond       a owl:ObjectProperty ; rdfs:domain c:Bond ; rdfs:range c:Atom .

c:amesTestPositive a owl:DatatypeProperty ; rdfs:domain c:Compound ; rdfs:range xsd:boolean .
c:salmonella       a owl:DatatypeProperty ; rdfs:domain c:Compound ; rdfs:range xsd:boolean .
c:cytogen_ca       a owl:DatatypeProperty ; rdfs:domain c:Compound ; rdfs:range xsd:boolean .
c:charge           a owl:DatatypeProperty ; rdfs:domain c:Atom ; rdfs:range xsd:double .

# d1: two nitro nitrogens and a chlorine
c:d1 a c:Compound ;
    c:hasAtom c:d1_1, c:d1_2, c:d1_3 ;
    c:hasBond c:bond1, c:bond2 ;
    c:hasStructure c:d1_benzene, c:d1_amine ;
    c:amesTestPositive true ;
    c:salmonella false .

c:d1_1 a owl:NamedIndividual, c:Nitro-N ;
    c:charge "-0.13"^^xsd:double .
c:d1_2 a c:Nitro-N .
c:d1_3 a c:Halogen-Cl .

c:bond1 a c:Bond-1 ; c:inBond c:d1_1, c:d1_2 .
c:bond2 a c:Bond-2 ; c:inBond c:d1_2, c:d1_3 .

c:d1_benzene a c:Benzene .
c:d1_amine   a c:Amine .

# d2: carbons and a hydrogen, one malformed bond
c:d2 a c:Compound ;
    c:hasAtom c:d2_1, c:d2_2, c:d2_3 ;
    c:hasBond c:bond3 ;
    c:hasStructure c:d2_nitro ;
    c:amesTestPositive false ;
    c:cytogen_ca true .

c:d2_1 a c:Carbon-22 .
c:d2_2 a c:Carbon-22 .
c:d2_3 a c:Hydrogen-3 .

c:bond3 a c:Bond-7 ; c:inBond c:d2_1, c:d2_2, c:d2_3 .

c:d2_nitro a c:Nitro .

# d3: no edges at all
c:d3 a c:Compound .

# d4: bond atom ordering
c:d4 a c:Compound ;
    c:hasAtom c:a2, c:a10 ;
    c:hasBond c:bond4 .

c:a2  a c:Carbon-22 .
c:a10 a c:Halogen-Cl .

c:bond4 a c:Bond-1 ; c:inBond c:a2, c:a10 .

# Individual of a class outside the four hierarchies
c:mystery a c:Other .
"#;
