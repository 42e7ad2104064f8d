//! Fixed seed catalog. Order is significant: inventory derives from position.

use super::model::record::SourceRecord;

pub const CATALOG: &[SourceRecord] = &[
    SourceRecord {
        title: "Clean Code",
        author: "Robert C. Martin",
        isbn: "9780132350884",
        category: "Informatique",
        published_date: "2008",
        description: "A handbook of agile software craftsmanship.",
    },
    SourceRecord {
        title: "The Pragmatic Programmer",
        author: "Andrew Hunt, David Thomas",
        isbn: "9780135957059",
        category: "Informatique",
        published_date: "2019",
        description: "Practical techniques for effective software development.",
    },
    SourceRecord {
        title: "Design Patterns",
        author: "Erich Gamma et al.",
        isbn: "9780201633610",
        category: "Informatique",
        published_date: "1994",
        description: "Classic catalog of reusable object-oriented design patterns.",
    },
    SourceRecord {
        title: "Refactoring",
        author: "Martin Fowler",
        isbn: "9780134757599",
        category: "Informatique",
        published_date: "2018",
        description: "Improving existing code structure without changing behavior.",
    },
    SourceRecord {
        title: "Introduction to Algorithms",
        author: "Cormen, Leiserson, Rivest, Stein",
        isbn: "9780262046305",
        category: "Informatique",
        published_date: "2022",
        description: "Comprehensive textbook on algorithms and data structures.",
    },
    SourceRecord {
        title: "Code Complete",
        author: "Steve McConnell",
        isbn: "9780735619678",
        category: "Informatique",
        published_date: "2004",
        description: "Software construction best practices and engineering discipline.",
    },
    SourceRecord {
        title: "Domain-Driven Design",
        author: "Eric Evans",
        isbn: "9780321125217",
        category: "Informatique",
        published_date: "2003",
        description: "Tackling complexity in software design with domain modeling.",
    },
    SourceRecord {
        title: "Cracking the Coding Interview",
        author: "Gayle Laakmann McDowell",
        isbn: "9780984782857",
        category: "Informatique",
        published_date: "2015",
        description: "Interview prep with programming questions and solutions.",
    },
    SourceRecord {
        title: "Deep Learning",
        author: "Ian Goodfellow, Yoshua Bengio, Aaron Courville",
        isbn: "9780262035613",
        category: "Intelligence Artificielle",
        published_date: "2016",
        description: "Foundational textbook for deep learning theory and practice.",
    },
    SourceRecord {
        title: "Artificial Intelligence: A Modern Approach",
        author: "Stuart Russell, Peter Norvig",
        isbn: "9780134610993",
        category: "Intelligence Artificielle",
        published_date: "2020",
        description: "Leading textbook on artificial intelligence methods.",
    },
    SourceRecord {
        title: "The Mythical Man-Month",
        author: "Frederick P. Brooks Jr.",
        isbn: "9780201835953",
        category: "Gestion de Projet",
        published_date: "1995",
        description: "Essays on software project management and productivity.",
    },
    SourceRecord {
        title: "Peopleware",
        author: "Tom DeMarco, Timothy Lister",
        isbn: "9780321934116",
        category: "Gestion de Projet",
        published_date: "2013",
        description: "Human factors behind productive teams and organizations.",
    },
    SourceRecord {
        title: "Sapiens",
        author: "Yuval Noah Harari",
        isbn: "9780062316097",
        category: "Histoire",
        published_date: "2015",
        description: "A brief history of humankind from evolution to modern societies.",
    },
    SourceRecord {
        title: "Thinking, Fast and Slow",
        author: "Daniel Kahneman",
        isbn: "9780374533557",
        category: "Psychologie",
        published_date: "2013",
        description: "How two systems of thought shape our decisions.",
    },
    SourceRecord {
        title: "Atomic Habits",
        author: "James Clear",
        isbn: "9780735211292",
        category: "Developpement Personnel",
        published_date: "2018",
        description: "Practical framework for building good habits and breaking bad ones.",
    },
    SourceRecord {
        title: "The Lean Startup",
        author: "Eric Ries",
        isbn: "9780307887894",
        category: "Entrepreneuriat",
        published_date: "2011",
        description: "How to build startups using iterative validated learning.",
    },
    SourceRecord {
        title: "Zero to One",
        author: "Peter Thiel, Blake Masters",
        isbn: "9780804139298",
        category: "Entrepreneuriat",
        published_date: "2014",
        description: "Notes on building unique and defensible companies.",
    },
    SourceRecord {
        title: "The Intelligent Investor",
        author: "Benjamin Graham",
        isbn: "9780060555665",
        category: "Finance",
        published_date: "2006",
        description: "Classic guide to long-term value investing.",
    },
    SourceRecord {
        title: "Rich Dad Poor Dad",
        author: "Robert T. Kiyosaki",
        isbn: "9781612681139",
        category: "Finance",
        published_date: "2017",
        description: "Popular personal finance principles through two perspectives.",
    },
    SourceRecord {
        title: "The Psychology of Money",
        author: "Morgan Housel",
        isbn: "9780857197689",
        category: "Finance",
        published_date: "2020",
        description: "Timeless lessons on wealth, greed, and happiness.",
    },
    SourceRecord {
        title: "1984",
        author: "George Orwell",
        isbn: "9780451524935",
        category: "Litterature",
        published_date: "1950",
        description: "Dystopian novel about surveillance and totalitarian control.",
    },
    SourceRecord {
        title: "To Kill a Mockingbird",
        author: "Harper Lee",
        isbn: "9780061120084",
        category: "Litterature",
        published_date: "2006",
        description: "Classic novel about justice and racial inequality.",
    },
    SourceRecord {
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        isbn: "9780743273565",
        category: "Litterature",
        published_date: "2004",
        description: "A portrait of wealth, illusion, and ambition in the Jazz Age.",
    },
    SourceRecord {
        title: "The Alchemist",
        author: "Paulo Coelho",
        isbn: "9780062315007",
        category: "Litterature",
        published_date: "2014",
        description: "Philosophical novel about purpose, destiny, and perseverance.",
    },
    SourceRecord {
        title: "Harry Potter and the Sorcerer's Stone",
        author: "J.K. Rowling",
        isbn: "9780590353427",
        category: "Fantasy",
        published_date: "1998",
        description: "The first adventure of Harry Potter at Hogwarts.",
    },
    SourceRecord {
        title: "The Hobbit",
        author: "J.R.R. Tolkien",
        isbn: "9780547928227",
        category: "Fantasy",
        published_date: "2012",
        description: "Bilbo Baggins sets out on an unexpected journey.",
    },
    SourceRecord {
        title: "The Lord of the Rings",
        author: "J.R.R. Tolkien",
        isbn: "9780618640157",
        category: "Fantasy",
        published_date: "2005",
        description: "Epic tale of friendship and the struggle against darkness.",
    },
    SourceRecord {
        title: "A Brief History of Time",
        author: "Stephen Hawking",
        isbn: "9780553380163",
        category: "Science",
        published_date: "1998",
        description: "Accessible introduction to cosmology and modern physics.",
    },
    SourceRecord {
        title: "The Selfish Gene",
        author: "Richard Dawkins",
        isbn: "9780199291151",
        category: "Science",
        published_date: "2006",
        description: "Influential perspective on evolution centered on genes.",
    },
    SourceRecord {
        title: "The Art of War",
        author: "Sun Tzu",
        isbn: "9781599869773",
        category: "Strategie",
        published_date: "2007",
        description: "Ancient treatise on strategy and leadership.",
    },
];
